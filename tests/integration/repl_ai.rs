//! Integration tests for prompt forwarding and the /ai command family

use airic::agent::{AgentClient, AgentSettings, SettingValue};
use airic::config::ReplConfig;
use airic::error::AgentError;
use airic::repl::{CapturedOutput, Rendered, Repl};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

use crate::integration::{initialized_workspace, mock_repl};

/// Agent double that records what it was sent
struct RecordingAgent {
    seen: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl AgentClient for RecordingAgent {
    async fn interact(&self, prompt: &str, user_id: &str) -> Result<String, AgentError> {
        self.seen.lock().push((prompt.to_string(), user_id.to_string()));
        Ok("**noted**".to_string())
    }

    fn service_name(&self) -> &str {
        "recording"
    }

    fn model_name(&self) -> &str {
        "tape"
    }
}

#[tokio::test]
async fn test_free_text_goes_to_agent() {
    let mut repl = mock_repl(None);
    repl.handle_line("hello there").await;
    assert_eq!(
        repl.renderer().items(),
        &[
            Rendered::Info("Sending request to AI agent...".to_string()),
            Rendered::Markdown("Hello! How can I assist you today?".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_prompt_carries_active_document_context() {
    let temp = TempDir::new().unwrap();
    let root = initialized_workspace(&temp);
    fs::write(root.join("draft.md"), "---\nagent: writer\n---\n\nFirst paragraph.").unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let config = ReplConfig {
        user_id: "alex".to_string(),
        ..ReplConfig::default()
    };
    let settings = AgentSettings {
        provider: "mock".to_string(),
        ..AgentSettings::default()
    };
    let mut repl = Repl::new(CapturedOutput::new(), settings, config)
        .with_agent(Box::new(RecordingAgent { seen: seen.clone() }))
        .with_workspace_path(Some(root.clone()));
    repl.start();

    repl.handle_line("/close").await;
    repl.handle_line("  plain question  ").await;
    repl.handle_line("/open draft.md").await;
    repl.handle_line("tighten this").await;

    let seen = seen.lock();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], ("plain question".to_string(), "alex".to_string()));
    assert_eq!(
        seen[1].0,
        "tighten this\n\nCurrent Document Context (draft.md):\nFirst paragraph."
    );
    assert!(repl
        .renderer()
        .items()
        .contains(&Rendered::Markdown("**noted**".to_string())));
}

#[tokio::test]
async fn test_unavailable_agent_reports_error_and_continues() {
    let settings = AgentSettings {
        provider: "carrier-pigeon".to_string(),
        ..AgentSettings::default()
    };
    let mut repl = Repl::new(CapturedOutput::new(), settings, ReplConfig::default());
    assert_eq!(repl.agent().service_name(), "carrier-pigeon");

    repl.handle_line("anyone there?").await;
    let errors = repl.renderer().errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Error interacting with AI agent: Unknown agent provider"));
}

#[tokio::test]
async fn test_ai_info_lists_service_and_settings() {
    let mut repl = mock_repl(None);
    repl.handle_line("/ai").await;

    match repl.renderer().tables().as_slice() {
        [Rendered::Table { title, rows, .. }] => {
            assert_eq!(title, "AI Service Information");
            assert_eq!(rows[0], vec!["Service".to_string(), "mock".to_string()]);
            assert_eq!(rows[1], vec!["Model".to_string(), "mock".to_string()]);
            assert!(rows.contains(&vec!["provider".to_string(), "mock".to_string()]));
        }
        other => panic!("expected one table, got {:?}", other),
    }
    assert!(repl.renderer().contains("/ai settings temperature=0.7"));

    repl.renderer_mut().take();
    repl.handle_line("/ai INFO").await;
    assert_eq!(repl.renderer().tables().len(), 1);
}

#[tokio::test]
async fn test_ai_settings_rebuilds_agent() {
    let mut repl = mock_repl(None);
    repl.handle_line("/ai settings model=canned temperature=0.7 stream=true")
        .await;

    assert!(repl.renderer().contains("AI settings updated successfully"));
    assert_eq!(repl.agent().model_name(), "canned");
    let settings = repl.agent_settings();
    assert_eq!(settings.model, "canned");
    assert_eq!(
        settings.extra.get("temperature"),
        Some(&SettingValue::Float(0.7))
    );
    assert_eq!(settings.extra.get("stream"), Some(&SettingValue::Bool(true)));
}

#[tokio::test]
async fn test_ai_settings_rejects_bad_input() {
    let mut repl = mock_repl(None);

    repl.handle_line("/ai settings verbose").await;
    assert_eq!(
        repl.renderer().errors(),
        vec![
            "Invalid setting format: verbose. Use key=value",
            "No valid settings provided"
        ]
    );

    repl.renderer_mut().take();
    repl.handle_line("/ai settings max_retries=lots").await;
    let errors = repl.renderer().errors();
    assert!(errors[0].starts_with("Invalid setting max_retries:"));
    assert_eq!(errors[1], "No valid settings provided");
    assert_eq!(repl.agent_settings().max_retries, 3);

    repl.renderer_mut().take();
    repl.handle_line("/ai reset").await;
    assert_eq!(repl.renderer().errors(), vec!["Unknown AI subcommand: reset"]);
    assert!(repl
        .renderer()
        .contains("Available subcommands: info, settings"));
}

#[tokio::test]
async fn test_partial_settings_apply_valid_pairs() {
    let mut repl = mock_repl(None);
    repl.handle_line("/ai settings max_retries=-1 top_k=40").await;

    assert!(repl
        .renderer()
        .errors()
        .iter()
        .any(|e| e.starts_with("Invalid setting max_retries:")));
    assert!(repl.renderer().contains("AI settings updated successfully"));
    assert_eq!(
        repl.agent_settings().extra.get("top_k"),
        Some(&SettingValue::Int(40))
    );
}
