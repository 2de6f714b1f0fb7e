//! Output sinks for the session.

use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;

pub trait Renderer {
    fn info(&mut self, message: &str);
    fn success(&mut self, message: &str);
    fn warning(&mut self, message: &str);
    fn error(&mut self, message: &str);
    fn markdown(&mut self, text: &str);
    fn table(&mut self, title: &str, headers: &[&str], rows: Vec<Vec<String>>);
    fn panel(&mut self, title: &str, body: &str);
}

/// Colored stdout output
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn info(&mut self, message: &str) {
        println!("{}", message.blue());
    }

    fn success(&mut self, message: &str) {
        println!("{}", message.green());
    }

    fn warning(&mut self, message: &str) {
        println!("{}", message.yellow());
    }

    fn error(&mut self, message: &str) {
        println!("{}", message.red().bold());
    }

    /// Headings in bold, everything else verbatim.
    fn markdown(&mut self, text: &str) {
        for line in text.lines() {
            if line.trim_start().starts_with('#') {
                println!("{}", line.trim_start_matches('#').trim().bold().underline());
            } else {
                println!("{}", line);
            }
        }
    }

    fn table(&mut self, title: &str, headers: &[&str], rows: Vec<Vec<String>>) {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(headers.to_vec());
        for row in rows {
            table.add_row(row);
        }
        println!("{}", title.bold());
        println!("{}", table);
    }

    fn panel(&mut self, title: &str, body: &str) {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![title]);
        table.add_row(vec![body]);
        println!("{}", table);
    }
}

/// One recorded render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
    Markdown(String),
    Table {
        title: String,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Panel {
        title: String,
        body: String,
    },
}

impl Rendered {
    /// Every piece of text the item would show.
    pub fn text(&self) -> String {
        match self {
            Self::Info(s) | Self::Success(s) | Self::Warning(s) | Self::Error(s) | Self::Markdown(s) => {
                s.clone()
            }
            Self::Table {
                title,
                headers,
                rows,
            } => {
                let mut parts = vec![title.clone(), headers.join(" ")];
                parts.extend(rows.iter().map(|row| row.join(" ")));
                parts.join("\n")
            }
            Self::Panel { title, body } => format!("{}\n{}", title, body),
        }
    }
}

/// Records output in memory instead of printing it
#[derive(Debug, Default)]
pub struct CapturedOutput {
    items: Vec<Rendered>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Rendered] {
        &self.items
    }

    /// Drain everything recorded so far.
    pub fn take(&mut self) -> Vec<Rendered> {
        std::mem::take(&mut self.items)
    }

    pub fn errors(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                Rendered::Error(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn tables(&self) -> Vec<&Rendered> {
        self.items
            .iter()
            .filter(|item| matches!(item, Rendered::Table { .. }))
            .collect()
    }

    /// True when any recorded item contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.items.iter().any(|item| item.text().contains(needle))
    }
}

impl Renderer for CapturedOutput {
    fn info(&mut self, message: &str) {
        self.items.push(Rendered::Info(message.to_string()));
    }

    fn success(&mut self, message: &str) {
        self.items.push(Rendered::Success(message.to_string()));
    }

    fn warning(&mut self, message: &str) {
        self.items.push(Rendered::Warning(message.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.items.push(Rendered::Error(message.to_string()));
    }

    fn markdown(&mut self, text: &str) {
        self.items.push(Rendered::Markdown(text.to_string()));
    }

    fn table(&mut self, title: &str, headers: &[&str], rows: Vec<Vec<String>>) {
        self.items.push(Rendered::Table {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        });
    }

    fn panel(&mut self, title: &str, body: &str) {
        self.items.push(Rendered::Panel {
            title: title.to_string(),
            body: body.to_string(),
        });
    }
}
