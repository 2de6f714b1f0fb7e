//! Integration tests for layered application config

use airic::cli::RunContext;
use airic::config::{global_config_path, ConfigLoader};
use std::fs;
use tempfile::TempDir;

use crate::integration::with_xdg_env;

#[test]
fn test_defaults_without_any_file() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, &[], || {
        let config = ConfigLoader::load().unwrap();
        assert_eq!(config.agent.provider, "gemini");
        assert_eq!(config.agent.model, "gemini-1.5-flash");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.output, "stderr");
        assert_eq!(config.repl.user_id, "repl_user");
        assert_eq!(
            config.repl.default_documents,
            vec!["README.md".to_string(), "index.md".to_string()]
        );
    });
}

#[test]
fn test_global_file_is_picked_up_from_xdg_config_home() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, &[], || {
        let path = global_config_path().unwrap();
        assert_eq!(
            path,
            test_dir.path().join("config").join("airic").join("config.toml")
        );
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "[agent]\nprovider = \"mock\"\n\n[repl]\ndefault_documents = [\"home.md\"]\n",
        )
        .unwrap();

        let config = ConfigLoader::load().unwrap();
        assert_eq!(config.agent.provider, "mock");
        assert_eq!(config.repl.default_documents, vec!["home.md".to_string()]);
    });
}

#[test]
fn test_environment_overrides_file() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(
        &test_dir,
        &[
            ("AIRIC_AGENT__MODEL", "gemini-1.5-pro"),
            ("AIRIC_AGENT__MAX_RETRIES", "7"),
        ],
        || {
            let path = global_config_path().unwrap();
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "[agent]\nmodel = \"from-file\"\n").unwrap();

            let config = ConfigLoader::load().unwrap();
            assert_eq!(config.agent.model, "gemini-1.5-pro");
            assert_eq!(config.agent.max_retries, 7);
        },
    );
}

#[test]
fn test_run_context_with_missing_config_file_fails() {
    let test_dir = TempDir::new().unwrap();
    let err = RunContext::new(None, Some(test_dir.path().join("absent.toml")))
        .err()
        .unwrap();
    assert!(err.to_string().starts_with("Configuration error: Config file not found"));
}

#[test]
fn test_run_context_with_explicit_file() {
    let test_dir = TempDir::new().unwrap();
    let path = test_dir.path().join("airic.toml");
    fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();
    with_xdg_env(&test_dir, &[], || {
        let ctx = RunContext::new(None, Some(path.clone())).unwrap();
        assert_eq!(ctx.config().logging.level, "debug");
    });
}
