//! Slash-command table.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Help,
    Exit,
    List,
    Open,
    New,
    Info,
    Close,
    Init,
    Edit,
    Save,
    Ai,
}

/// Every accepted command name, aliases included.
pub const COMMANDS: &[(&str, CommandKind)] = &[
    ("exit", CommandKind::Exit),
    ("quit", CommandKind::Exit),
    ("help", CommandKind::Help),
    ("list", CommandKind::List),
    ("open", CommandKind::Open),
    ("info", CommandKind::Info),
    ("close", CommandKind::Close),
    ("new", CommandKind::New),
    ("init", CommandKind::Init),
    ("edit", CommandKind::Edit),
    ("save", CommandKind::Save),
    ("ai", CommandKind::Ai),
];

/// Case-insensitive lookup.
pub fn lookup(name: &str) -> Option<CommandKind> {
    let name = name.to_ascii_lowercase();
    COMMANDS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, kind)| *kind)
}

/// Sorted command names.
pub fn command_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = COMMANDS.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}

pub const HELP_TITLE: &str = "Airic Help";

pub const HELP_TEXT: &str = "\
Basic Commands:
  /help            Show this help message
  /exit, /quit     Exit the REPL
  /init [path]     Initialize a workspace at the current or specified path

Document Commands:
  /list [pattern]  List documents in the workspace
  /open <path>     Open a document (path or [[WikiLink]]); no argument reloads it
  /new <path>      Create and open a new document
  /info            Show information about the active document
  /close           Close the active document
  /edit            Edit the active document in $EDITOR
  /save            Save changes to the active document

AI Commands:
  /ai              Display AI service information
  /ai info         Show details about the current AI service
  /ai settings ... Configure AI service settings (e.g., '/ai settings temperature=0.7')

Type any text without a leading / to interact with the AI.";
