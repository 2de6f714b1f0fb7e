//! Integration tests for workspace discovery, validation, and config persistence

use airic::error::WorkspaceError;
use airic::workspace::{
    find_workspace_root, with_workspace, TemplateKind, Workspace, WorkspaceConfig,
    WorkspaceContext, WORKSPACE_DIR,
};
use tempfile::TempDir;

use crate::integration::{initialized_workspace, with_current_dir};

#[test]
fn test_discovery_from_nested_directory() {
    let temp = TempDir::new().unwrap();
    let root = initialized_workspace(&temp);
    let nested = root.join("notes").join("2024");
    std::fs::create_dir_all(&nested).unwrap();

    assert_eq!(find_workspace_root(Some(nested.as_path())), Some(root.clone()));
    let ctx = WorkspaceContext::acquire(Some(root.as_path())).unwrap();
    assert_eq!(ctx.root(), root.as_path());
}

#[test]
fn test_acquire_discovers_from_current_directory() {
    let temp = TempDir::new().unwrap();
    let root = initialized_workspace(&temp);
    let nested = root.join("drafts");
    std::fs::create_dir_all(&nested).unwrap();

    let found = with_current_dir(&nested, || {
        WorkspaceContext::acquire(None).map(|ctx| ctx.root().to_path_buf())
    });
    assert_eq!(found.unwrap(), root);
}

#[test]
fn test_acquire_outside_workspace_is_not_found() {
    let temp = TempDir::new().unwrap();
    let plain = dunce::canonicalize(temp.path()).unwrap();

    let result = with_current_dir(&plain, || WorkspaceContext::acquire(None).map(|_| ()));
    // A workspace further up (e.g. in the user's home) would be found instead.
    if find_workspace_root(Some(plain.as_path())).is_none() {
        assert!(matches!(result, Err(WorkspaceError::NotFound { .. })));
    }
}

#[test]
fn test_partial_structure_lists_every_problem() {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();
    std::fs::create_dir_all(root.join(WORKSPACE_DIR).join("meta")).unwrap();

    let workspace = Workspace::new(&root);
    assert!(!workspace.is_initialized());
    let problems = workspace.validate();
    assert!(problems
        .iter()
        .any(|p| p == "Missing required directory: .airic/history"));
    assert!(problems
        .iter()
        .any(|p| p == "Missing required directory: .airic/meta/agents"));
    assert!(problems
        .iter()
        .any(|p| p.starts_with("Missing workspace configuration file")));

    match WorkspaceContext::acquire(Some(root.as_path())) {
        Err(WorkspaceError::Validation { problems: reported, .. }) => {
            assert_eq!(reported, problems)
        }
        other => panic!("expected validation error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_config_round_trips_through_disk() {
    let temp = TempDir::new().unwrap();
    let root = initialized_workspace(&temp);

    let mut workspace = Workspace::new(&root);
    let mut config = workspace.config().clone();
    assert!(config.created_at().is_some());
    config.set("name", "Lab Notebook");
    config.set("retention_days", 30);
    workspace.save_config(config).unwrap();

    let reloaded = Workspace::new(&root);
    assert_eq!(reloaded.name(), "Lab Notebook");
    assert_eq!(
        reloaded.config().get("retention_days"),
        Some(&serde_yaml::Value::from(30))
    );
}

#[test]
fn test_unparseable_config_reads_as_empty() {
    let temp = TempDir::new().unwrap();
    let root = initialized_workspace(&temp);
    std::fs::write(root.join(".airic").join("config.yaml"), "name: [broken").unwrap();

    let workspace = Workspace::new(&root);
    assert!(matches!(
        workspace.load_config(),
        Err(WorkspaceError::ConfigParse { .. })
    ));
    assert!(workspace.config().is_empty());
    let dir_name = root.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(workspace.name(), dir_name);
}

#[test]
fn test_initialize_fills_defaults() {
    let temp = TempDir::new().unwrap();
    let mut workspace = Workspace::new(temp.path());
    let mut config = WorkspaceConfig::new();
    config.set("name", "Direct");
    workspace.initialize(config).unwrap();

    assert!(workspace.is_initialized());
    assert_eq!(workspace.config().version().as_deref(), Some("0.1.0"));
    assert!(workspace.list_templates(TemplateKind::Workflows).is_empty());
}

#[test]
fn test_with_workspace_scopes_access() {
    let temp = TempDir::new().unwrap();
    let root = initialized_workspace(&temp);

    let agents =
        with_workspace(Some(root.as_path()), |ws| ws.list_templates(TemplateKind::Agents))
            .unwrap();
    assert_eq!(agents, vec!["default".to_string(), "writer".to_string()]);
}
