//! CLI presentation: text formatters per command family.

use crate::init::InitReport;
use crate::workspace::{TemplateKind, Workspace};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

pub fn format_init_report(report: &InitReport, force: bool) -> String {
    match report {
        InitReport::AlreadyInitialized { root } => format!(
            "Workspace already initialized at {}\nUse --force to rewrite the configuration and templates.",
            root.display()
        ),
        InitReport::Created {
            root,
            directories,
            files,
            readme,
        } => {
            let verb = if force { "Reinitialized" } else { "Initialized" };
            let mut output = format!("{} Airic workspace at {}\n", verb, root.display());
            for dir in directories {
                output.push_str(&format!("  ✓ {}/\n", relative(dir, root)));
            }
            for file in files {
                output.push_str(&format!("  ✓ {}\n", relative(file, root)));
            }
            if let Some(readme) = readme {
                output.push_str(&format!("  ✓ {}\n", relative(readme, root)));
            }
            if directories.is_empty() && files.is_empty() && readme.is_none() {
                output.push_str("  (no new files; existing files were rewritten)\n");
            }
            output.push_str("\nRun 'airic' in this directory to start a session.");
            output
        }
    }
}

pub fn format_workspace_info(workspace: &Workspace) -> String {
    let mut output = format!("Workspace: {}\nRoot: {}\n\n", workspace.name(), workspace.root().display());

    let mut config = Table::new();
    config.load_preset(UTF8_FULL);
    config.set_header(vec!["Key", "Value"]);
    for (key, value) in workspace.config().iter() {
        let shown = crate::document::value_to_string(value).unwrap_or_else(|| {
            serde_yaml::to_string(value)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default()
        });
        config.add_row(vec![key.clone(), shown]);
    }
    output.push_str("Configuration:\n");
    output.push_str(&config.to_string());
    output.push_str("\n\nTemplates:\n");

    for kind in TemplateKind::ALL {
        let names = workspace.list_templates(kind);
        let listed = if names.is_empty() {
            "(none)".to_string()
        } else {
            names.join(", ")
        };
        output.push_str(&format!("  {:<10} {}\n", kind.dir_name(), listed));
    }
    output.trim_end().to_string()
}

pub fn format_check_ok(workspace: &Workspace) -> String {
    format!("Workspace at {} is valid", workspace.root().display())
}

fn relative(path: &std::path::Path, root: &std::path::Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
