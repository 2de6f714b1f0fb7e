//! Integration tests for workspace initialization on the real filesystem

use airic::error::InitError;
use airic::init::{initialize_workspace, InitOptions, InitReport, Initializer, DEFAULT_TEMPLATES};
use airic::workspace::{TemplateKind, Workspace, WorkspaceContext};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_init_creates_structure_templates_and_readme() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("research");
    let options = InitOptions {
        name: Some("Research".to_string()),
        description: Some("Reading notes".to_string()),
        ..InitOptions::default()
    };

    let report = initialize_workspace(&root, &options).unwrap();
    match &report {
        InitReport::Created {
            directories,
            files,
            readme,
            ..
        } => {
            // root plus the six required directories
            assert_eq!(directories.len(), 7);
            // config plus every default template
            assert_eq!(files.len(), DEFAULT_TEMPLATES.len() + 1);
            assert_eq!(readme.as_deref(), Some(root.join("README.md").as_path()));
        }
        other => panic!("unexpected report: {:?}", other),
    }

    let ctx = WorkspaceContext::acquire(Some(root.as_path())).unwrap();
    assert_eq!(ctx.name(), "Research");
    assert_eq!(ctx.config().description().as_deref(), Some("Reading notes"));
    assert!(ctx.config().created_at().is_some());
    assert_eq!(
        ctx.list_templates(TemplateKind::Doctypes),
        vec!["brainstorming".to_string(), "meeting_notes".to_string()]
    );
    assert_eq!(
        ctx.list_templates(TemplateKind::Workflows),
        vec!["document_review".to_string()]
    );

    let readme = fs::read_to_string(root.join("README.md")).unwrap();
    assert!(readme.starts_with("# Research\n\nReading notes"));
}

#[test]
fn test_second_init_changes_nothing() {
    let temp = TempDir::new().unwrap();
    initialize_workspace(temp.path(), &InitOptions::default()).unwrap();
    let config_path = Workspace::new(temp.path()).config_path();
    let before = fs::read_to_string(&config_path).unwrap();

    let options = InitOptions {
        name: Some("Renamed".to_string()),
        ..InitOptions::default()
    };
    let report = initialize_workspace(temp.path(), &options).unwrap();
    assert!(report.is_already_initialized());
    assert_eq!(report.messages(), vec!["Workspace already initialized".to_string()]);
    assert_eq!(fs::read_to_string(&config_path).unwrap(), before);
}

#[test]
fn test_reinitialize_restores_deleted_template_and_keeps_config() {
    let temp = TempDir::new().unwrap();
    let options = InitOptions {
        name: Some("Keep".to_string()),
        ..InitOptions::default()
    };
    initialize_workspace(temp.path(), &options).unwrap();
    let workspace = Workspace::new(temp.path());
    let writer = workspace
        .templates_dir(TemplateKind::Agents)
        .join("writer.md");
    fs::remove_file(&writer).unwrap();

    let report = Initializer::default()
        .reinitialize(temp.path(), &InitOptions::default())
        .unwrap();
    assert!(!report.is_already_initialized());
    assert!(writer.is_file());
    assert_eq!(Workspace::new(temp.path()).name(), "Keep");
}

#[test]
fn test_init_keeps_existing_user_files() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("README.md"), "# Mine\n").unwrap();
    fs::write(temp.path().join("notes.md"), "untouched").unwrap();

    let report = initialize_workspace(temp.path(), &InitOptions::default()).unwrap();
    match report {
        InitReport::Created { readme, .. } => assert!(readme.is_none()),
        other => panic!("unexpected report: {:?}", other),
    }
    assert_eq!(fs::read_to_string(temp.path().join("README.md")).unwrap(), "# Mine\n");
    assert_eq!(fs::read_to_string(temp.path().join("notes.md")).unwrap(), "untouched");
}

#[test]
fn test_init_on_file_is_error() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("not-a-dir");
    fs::write(&file, "x").unwrap();
    let err = initialize_workspace(&file, &InitOptions::default()).unwrap_err();
    assert!(matches!(err, InitError::Unexpected(_)));
}

#[cfg(unix)]
#[test]
fn test_read_only_parent_is_permission_denied() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let locked = temp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged users ignore the mode bits; nothing to assert for them.
    let probe = locked.join("probe");
    let writable = fs::write(&probe, "").is_ok();
    if !writable {
        let err = initialize_workspace(&locked, &InitOptions::default()).unwrap_err();
        assert!(matches!(err, InitError::PermissionDenied { .. }));
        assert!(!locked.join(".airic").exists());
    }

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
}
