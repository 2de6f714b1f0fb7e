//! Integration tests for session routing, state, and workspace handling

use airic::repl::{LineOutcome, Rendered, SessionState};
use std::fs;
use tempfile::TempDir;

use crate::integration::{initialized_workspace, mock_repl};

#[tokio::test]
async fn test_exit_and_quit_end_the_session() {
    let mut repl = mock_repl(None);
    assert_eq!(repl.handle_line("/exit").await, LineOutcome::Exit);
    assert_eq!(repl.handle_line("/QUIT").await, LineOutcome::Exit);
    assert!(repl.renderer().contains("Goodbye!"));
}

#[tokio::test]
async fn test_blank_line_renders_nothing() {
    let mut repl = mock_repl(None);
    assert_eq!(repl.handle_line("   ").await, LineOutcome::Continue);
    assert!(repl.renderer().items().is_empty());
}

#[tokio::test]
async fn test_unknown_command_is_reported_and_session_continues() {
    let mut repl = mock_repl(None);
    assert_eq!(repl.handle_line("/Frobnicate now").await, LineOutcome::Continue);
    assert_eq!(repl.renderer().errors(), vec!["Unknown command: frobnicate"]);
    assert!(repl
        .renderer()
        .contains("Type /help for a list of available commands."));
}

#[tokio::test]
async fn test_help_lists_commands() {
    let mut repl = mock_repl(None);
    repl.handle_line("/help").await;
    match repl.renderer().items() {
        [Rendered::Panel { title, body }] => {
            assert_eq!(title, "Airic Help");
            assert!(body.contains("/open <path>"));
            assert!(body.contains("/ai settings"));
        }
        other => panic!("unexpected output: {:?}", other),
    }
}

#[tokio::test]
async fn test_document_commands_need_a_workspace() {
    let mut repl = mock_repl(None);
    assert_eq!(repl.state(), SessionState::NoWorkspace);
    for line in ["/list", "/open notes.md", "/new notes.md"] {
        repl.handle_line(line).await;
    }
    assert_eq!(
        repl.renderer().errors(),
        vec!["No active workspace. Use /init to initialize a workspace."; 3]
    );
}

#[tokio::test]
async fn test_document_commands_need_an_active_document() {
    let mut repl = mock_repl(None);
    repl.handle_line("/info").await;
    repl.handle_line("/close").await;
    repl.handle_line("/edit").await;
    repl.handle_line("/save").await;
    assert_eq!(
        repl.renderer().errors(),
        vec![
            "No active document. Use /open or /new to open a document.",
            "No active document to close.",
            "No active document to edit.",
            "No active document to save.",
        ]
    );
}

#[test]
fn test_start_opens_readme_as_default_document() {
    let temp = TempDir::new().unwrap();
    let root = initialized_workspace(&temp);

    let repl = mock_repl(Some(&root));
    assert!(repl.renderer().contains("Welcome to Airic!"));
    assert!(repl
        .renderer()
        .contains("Opened default document: README.md"));
    assert_eq!(
        repl.state(),
        SessionState::WorkspaceWithDocument {
            doctype: None,
            agent: None
        }
    );
    assert_eq!(repl.prompt_text(), "[README.md] > ");
    let dir_name = root.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(
        repl.status_line(),
        format!("Workspace: {} | Document: README.md Type: none", dir_name)
    );
}

#[test]
fn test_start_falls_back_to_index() {
    let temp = TempDir::new().unwrap();
    let root = initialized_workspace(&temp);
    fs::remove_file(root.join("README.md")).unwrap();
    fs::write(
        root.join("index.md"),
        "---\ndoctype: hub\nagent: writer\n---\n\n# Index",
    )
    .unwrap();

    let repl = mock_repl(Some(&root));
    assert_eq!(repl.prompt_text(), "[index.md|writer] > ");
    assert!(repl.status_line().ends_with("Document: index.md Type: hub Agent: writer"));
}

#[test]
fn test_start_with_invalid_workspace_warns() {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();

    let repl = mock_repl(Some(&root));
    assert!(repl.workspace().is_none());
    assert!(repl.renderer().items().iter().any(|item| matches!(
        item,
        Rendered::Warning(message) if message.starts_with("Failed to load workspace at")
    )));
    assert_eq!(repl.prompt_text(), "airic > ");
}

#[tokio::test]
async fn test_init_command_creates_and_activates_workspace() {
    let temp = TempDir::new().unwrap();
    let target = dunce::canonicalize(temp.path()).unwrap().join("fresh");

    let mut repl = mock_repl(None);
    repl.handle_line(&format!("/init {}", target.display())).await;

    assert!(repl
        .renderer()
        .contains(&format!("Created directory: {}", target.display())));
    assert!(repl
        .renderer()
        .contains(&format!("Initialized new workspace: {}", target.display())));
    assert_eq!(repl.state(), SessionState::WorkspaceNoDocument);
    assert!(target.join(".airic").join("config.yaml").is_file());
}

#[tokio::test]
async fn test_init_inside_active_workspace_only_warns() {
    let temp = TempDir::new().unwrap();
    let root = initialized_workspace(&temp);
    let mut repl = mock_repl(Some(&root));
    repl.renderer_mut().take();

    repl.handle_line(&format!("/init {}", root.display())).await;
    assert!(repl
        .renderer()
        .contains(&format!("Already in workspace: {}", root.display())));
    assert!(repl
        .renderer()
        .contains("This is already the active workspace."));

    let other = root.join("elsewhere");
    repl.handle_line(&format!("/init {}", other.display())).await;
    assert!(repl
        .renderer()
        .contains("Use /exit and start a new REPL session to switch workspaces."));
    assert!(!other.exists());
}

#[tokio::test]
async fn test_init_adopts_existing_workspace() {
    let temp = TempDir::new().unwrap();
    let root = initialized_workspace(&temp);

    let mut repl = mock_repl(None);
    repl.handle_line(&format!("/init {}", root.display())).await;
    assert!(repl
        .renderer()
        .contains(&format!("Opened existing workspace: {}", root.display())));
    assert!(repl.workspace().is_some());
}

#[tokio::test]
async fn test_init_repairs_workspace_missing_its_config() {
    let temp = TempDir::new().unwrap();
    let root = initialized_workspace(&temp);
    let config_file = root.join(".airic").join("config.yaml");
    std::fs::remove_file(&config_file).unwrap();

    let mut repl = mock_repl(None);
    repl.handle_line(&format!("/init {}", root.display())).await;
    assert!(repl
        .renderer()
        .contains(&format!("Repaired workspace: {}", root.display())));
    assert!(repl.renderer().errors().is_empty());
    assert!(config_file.is_file());
    assert_eq!(repl.state(), SessionState::WorkspaceNoDocument);
}
