//! Interactive terminal loop over rustyline.

use super::completion::{complete, CompletionContext};
use super::render::{Renderer, TerminalRenderer};
use super::session::{LineOutcome, Repl, SessionState};
use crate::error::ApiError;
use futures::FutureExt;
use owo_colors::OwoColorize;
use parking_lot::RwLock;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, warn};

struct LineHelper {
    context: Arc<RwLock<CompletionContext>>,
}

impl rustyline::Helper for LineHelper {}

impl rustyline::highlight::Highlighter for LineHelper {}

impl rustyline::hint::Hinter for LineHelper {
    type Hint = String;
}

impl rustyline::validate::Validator for LineHelper {}

impl Completer for LineHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let context = self.context.read();
        let completions = complete(&line[..pos], &context);
        let pairs = completions
            .candidates
            .into_iter()
            .map(|c| Pair {
                display: c.display,
                replacement: c.replacement,
            })
            .collect();
        Ok((completions.start, pairs))
    }
}

fn load_history(editor: &mut Editor<LineHelper, DefaultHistory>, path: Option<&Path>) {
    let Some(path) = path else {
        return;
    };
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!(path = %parent.display(), error = %e, "Cannot create history directory");
            return;
        }
    }
    if path.exists() {
        if let Err(e) = editor.load_history(path) {
            warn!(path = %path.display(), error = %e, "Failed to load command history");
        }
    }
}

/// Run the session until `/exit` or end of input.
pub async fn run(mut repl: Repl<TerminalRenderer>, history_file: Option<&Path>) -> Result<(), ApiError> {
    let context = Arc::new(RwLock::new(CompletionContext::default()));
    let mut editor: Editor<LineHelper, DefaultHistory> = Editor::new()
        .map_err(|e| ApiError::Terminal(format!("Failed to initialize line editor: {}", e)))?;
    editor.set_helper(Some(LineHelper {
        context: Arc::clone(&context),
    }));
    load_history(&mut editor, history_file);

    repl.start();
    let mut last_state: Option<SessionState> = None;

    loop {
        *context.write() = repl.completion_context();
        let state = repl.state();
        if last_state.as_ref() != Some(&state) {
            println!("{}", repl.status_line().dimmed());
            last_state = Some(state);
        }

        let prompt = repl.prompt_text();
        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                repl.renderer_mut().warning("Operation cancelled.");
                continue;
            }
            Err(ReadlineError::Eof) => {
                repl.renderer_mut().success("Goodbye!");
                break;
            }
            Err(e) => {
                error!(error = %e, "Line editor failure");
                return Err(ApiError::Terminal(format!("Input error: {}", e)));
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = editor.add_history_entry(line.as_str()) {
            debug!(error = %e, "Failed to record history entry");
        }

        let outcome = tokio::select! {
            result = AssertUnwindSafe(repl.handle_line(&line)).catch_unwind() => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };
        match outcome {
            Some(Ok(LineOutcome::Continue)) => {}
            Some(Ok(LineOutcome::Exit)) => break,
            Some(Err(panic)) => {
                let message = panic
                    .downcast_ref::<String>()
                    .map(String::as_str)
                    .or_else(|| panic.downcast_ref::<&str>().copied())
                    .unwrap_or("unknown failure");
                error!(panic = message, "Command handler panicked");
                repl.renderer_mut().error(&format!("Error: {}", message));
            }
            None => repl.renderer_mut().warning("Operation cancelled."),
        }
    }

    if let Some(path) = history_file {
        if let Err(e) = editor.save_history(path) {
            warn!(path = %path.display(), error = %e, "Failed to save command history");
        }
    }
    Ok(())
}
