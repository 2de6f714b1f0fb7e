//! Shared test utilities for integration tests
//!
//! Centralizes environment isolation and the session fixtures most tests start from.

use airic::agent::{AgentSettings, MockAgent};
use airic::config::ReplConfig;
use airic::init::{initialize_workspace, InitOptions};
use airic::repl::{CapturedOutput, Repl};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Serializes every test that touches process-wide state (env vars, cwd)
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    vars: Vec<(&'static str, Option<String>)>,
}

impl EnvState {
    fn capture(names: &[&'static str]) -> Self {
        Self {
            vars: names
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.vars {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir`, plus any extra
/// variables given. Everything is restored afterwards.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, extra: &[(&'static str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let mut names = vec!["HOME", "XDG_CONFIG_HOME"];
    names.extend(extra.iter().map(|(name, _)| *name));
    let env_state = EnvState::capture(&names);

    let test_home = test_dir.path().join("home");
    let test_config_home = test_dir.path().join("config");
    std::fs::create_dir_all(&test_home).unwrap();
    std::fs::create_dir_all(&test_config_home).unwrap();

    std::env::set_var("HOME", &test_home);
    std::env::set_var("XDG_CONFIG_HOME", &test_config_home);
    for (name, value) in extra {
        std::env::set_var(name, value);
    }

    let result = f();

    env_state.restore();
    result
}

/// Run `f` with the process working directory set to `dir`.
pub fn with_current_dir<F, R>(dir: &Path, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir).unwrap();
    let result = f();
    std::env::set_current_dir(original).unwrap();
    result
}

/// Fresh initialized workspace; returns its canonical root.
pub fn initialized_workspace(temp: &TempDir) -> PathBuf {
    let root = dunce::canonicalize(temp.path()).unwrap();
    initialize_workspace(&root, &InitOptions::default()).unwrap();
    root
}

/// Session with captured output and the offline agent, already started against `root`.
pub fn mock_repl(root: Option<&Path>) -> Repl<CapturedOutput> {
    let settings = AgentSettings {
        provider: "mock".to_string(),
        model: "mock".to_string(),
        ..AgentSettings::default()
    };
    let mut repl = Repl::new(CapturedOutput::new(), settings, ReplConfig::default())
        .with_agent(Box::new(MockAgent::default()))
        .with_workspace_path(root.map(Path::to_path_buf));
    if root.is_some() {
        repl.start();
    }
    repl
}
