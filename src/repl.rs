//! Interactive session
//!
//! Lines starting with `/` are commands; anything else goes to the agent, with the active
//! document's body attached as context. The session tracks at most one workspace and one
//! active document.

pub mod commands;
pub mod completion;
pub mod editor;
pub mod render;
pub mod router;
pub mod session;
pub mod terminal;

pub use commands::{command_names, lookup, CommandKind, COMMANDS};
pub use completion::{complete, Candidate, CandidateKind, CompletionContext, Completions};
pub use editor::{BodyEditor, ExternalEditor};
pub use render::{CapturedOutput, Rendered, Renderer, TerminalRenderer};
pub use router::{resolve_document_path, route, DocumentTarget, Route};
pub use session::{ActiveDocument, LineOutcome, Repl, SessionState};

use crate::config::AiricConfig;
use crate::error::ApiError;
use std::path::PathBuf;

/// Start an interactive session on the terminal.
pub async fn start_repl(config: &AiricConfig, workspace: Option<PathBuf>) -> Result<(), ApiError> {
    let repl = Repl::new(TerminalRenderer, config.agent.clone(), config.repl.clone())
        .with_workspace_path(workspace);
    let history = config.repl.history_path();
    terminal::run(repl, history.as_deref()).await
}
