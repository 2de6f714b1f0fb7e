//! REPL session engine: state, command handlers, and AI forwarding.
//!
//! The engine never reads from the terminal itself. [`Repl::handle_line`] takes one
//! line, renders everything through the [`Renderer`], and reports whether the session
//! should continue. The interactive loop lives in `terminal`.

use super::commands::{CommandKind, HELP_TEXT, HELP_TITLE};
use super::completion::CompletionContext;
use super::editor::{BodyEditor, ExternalEditor};
use super::render::Renderer;
use super::router::{resolve_document_path, route, Route};
use crate::agent::{
    build_agent, parse_setting_value, AgentClient, AgentSettings, SettingValue, UnconfiguredAgent,
};
use crate::config::ReplConfig;
use crate::document::{find_documents, value_to_string, wikilink, Document};
use crate::error::WorkspaceError;
use crate::init::{initialize_workspace, InitOptions, Initializer};
use crate::workspace::{absolute_path, Workspace, WorkspaceContext};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const PREVIEW_CHARS: usize = 500;

/// Coarse session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NoWorkspace,
    WorkspaceNoDocument,
    WorkspaceWithDocument {
        doctype: Option<String>,
        agent: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    Exit,
}

/// The open document together with the doctype and agent read from its metadata.
/// Both are derived only in [`ActiveDocument::new`], so they always match the document.
#[derive(Debug, Clone)]
pub struct ActiveDocument {
    document: Document,
    doctype: Option<String>,
    agent: Option<String>,
}

impl ActiveDocument {
    pub fn new(document: Document) -> Self {
        let doctype = document.doctype();
        let agent = document.agent();
        Self {
            document,
            doctype,
            agent,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    pub fn agent(&self) -> Option<&str> {
        self.agent.as_deref()
    }
}

pub struct Repl<R: Renderer> {
    renderer: R,
    workspace_path: Option<PathBuf>,
    workspace: Option<Workspace>,
    active: Option<ActiveDocument>,
    agent: Box<dyn AgentClient>,
    agent_settings: AgentSettings,
    config: ReplConfig,
    editor: Box<dyn BodyEditor>,
}

impl<R: Renderer> Repl<R> {
    /// Build a session. An agent that cannot be built is replaced by one that reports
    /// the reason on every prompt.
    pub fn new(renderer: R, agent_settings: AgentSettings, config: ReplConfig) -> Self {
        let agent = build_agent(&agent_settings).unwrap_or_else(|e| {
            warn!(error = %e, "Agent unavailable");
            Box::new(UnconfiguredAgent::new(
                agent_settings.provider.clone(),
                agent_settings.model.clone(),
                e.to_string(),
            ))
        });
        Self {
            renderer,
            workspace_path: None,
            workspace: None,
            active: None,
            agent,
            agent_settings,
            config,
            editor: Box::new(ExternalEditor),
        }
    }

    /// Workspace to load in [`Repl::start`] instead of discovering from the cwd.
    pub fn with_workspace_path(mut self, path: Option<PathBuf>) -> Self {
        self.workspace_path = path;
        self
    }

    pub fn with_agent(mut self, agent: Box<dyn AgentClient>) -> Self {
        self.agent = agent;
        self
    }

    pub fn with_editor(mut self, editor: Box<dyn BodyEditor>) -> Self {
        self.editor = editor;
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub fn active_document(&self) -> Option<&ActiveDocument> {
        self.active.as_ref()
    }

    pub fn agent(&self) -> &dyn AgentClient {
        self.agent.as_ref()
    }

    pub fn agent_settings(&self) -> &AgentSettings {
        &self.agent_settings
    }

    pub fn state(&self) -> SessionState {
        match (&self.workspace, &self.active) {
            (None, _) => SessionState::NoWorkspace,
            (Some(_), None) => SessionState::WorkspaceNoDocument,
            (Some(_), Some(active)) => SessionState::WorkspaceWithDocument {
                doctype: active.doctype.clone(),
                agent: active.agent.clone(),
            },
        }
    }

    pub fn prompt_text(&self) -> String {
        match &self.active {
            Some(active) => match active.agent() {
                Some(agent) => format!("[{}|{}] > ", active.document.name(), agent),
                None => format!("[{}] > ", active.document.name()),
            },
            None => "airic > ".to_string(),
        }
    }

    pub fn status_line(&self) -> String {
        let workspace = match &self.workspace {
            Some(ws) => format!("Workspace: {}", ws.name()),
            None => "No active workspace".to_string(),
        };
        let document = match &self.active {
            Some(active) => {
                let mut parts = format!(
                    "Document: {} Type: {}",
                    active.document.name(),
                    active.doctype().unwrap_or("none")
                );
                if let Some(agent) = active.agent() {
                    parts.push_str(&format!(" Agent: {}", agent));
                }
                parts
            }
            None => "No active document".to_string(),
        };
        format!("{} | {}", workspace, document)
    }

    /// State the completer reads between prompts.
    pub fn completion_context(&self) -> CompletionContext {
        CompletionContext {
            workspace_root: self.workspace.as_ref().map(|ws| ws.root().to_path_buf()),
            wikilinks: self
                .active
                .as_ref()
                .map(|active| wikilink::unique_wikilinks(active.document.body()))
                .unwrap_or_default(),
        }
    }

    /// Welcome banner, workspace discovery, and the default document.
    pub fn start(&mut self) {
        self.renderer.panel(
            "Welcome to Airic!",
            "Your AI-assisted document workspace.\n\
             Type /help for available commands.\n\
             Type any text without a leading / to talk with the AI.",
        );

        let acquired = match self.workspace_path.clone() {
            Some(path) => WorkspaceContext::acquire(Some(path.as_path())).map_err(|e| {
                self.renderer.warning(&format!(
                    "Failed to load workspace at {}: {}",
                    path.display(),
                    e
                ));
            }),
            None => WorkspaceContext::acquire(None).map_err(|e| match e {
                WorkspaceError::NotFound { .. } => {
                    debug!("No workspace found from the current directory");
                }
                other => {
                    self.renderer.error(&format!("Error: {}", other));
                    self.renderer.warning(
                        "You are not in a valid Airic workspace. Some commands may not work.",
                    );
                    self.renderer
                        .info("Run /init to initialize a workspace in the current directory.");
                }
            }),
        };

        if let Ok(ctx) = acquired {
            info!(root = %ctx.root().display(), "Workspace loaded");
            self.workspace = Some(ctx.into_inner());
            self.open_default_document();
        }
    }

    fn open_default_document(&mut self) {
        let Some(root) = self.workspace.as_ref().map(|ws| ws.root().to_path_buf()) else {
            return;
        };
        for name in self.config.default_documents.clone() {
            let path = root.join(&name);
            if !path.exists() {
                continue;
            }
            match Document::load(&path) {
                Ok(document) => {
                    self.activate(document);
                    self.renderer
                        .info(&format!("Opened default document: {}", name));
                    return;
                }
                Err(e) => self.renderer.warning(&format!(
                    "Error opening default document {}: {}",
                    name, e
                )),
            }
        }
    }

    fn activate(&mut self, document: Document) {
        self.active = Some(ActiveDocument::new(document));
    }

    /// Process one line of input. Handler failures are rendered, never returned.
    pub async fn handle_line(&mut self, line: &str) -> LineOutcome {
        match route(line) {
            Route::Empty => LineOutcome::Continue,
            Route::Prompt(text) => {
                self.forward_to_agent(&text).await;
                LineOutcome::Continue
            }
            Route::Unknown(name) => {
                self.renderer.error(&format!("Unknown command: {}", name));
                self.renderer
                    .info("Type /help for a list of available commands.");
                LineOutcome::Continue
            }
            Route::Command { kind, args } => self.handle_command(kind, &args),
        }
    }

    fn handle_command(&mut self, kind: CommandKind, args: &str) -> LineOutcome {
        debug!(command = ?kind, args, "Dispatching command");
        match kind {
            CommandKind::Exit => {
                self.renderer.success("Goodbye!");
                return LineOutcome::Exit;
            }
            CommandKind::Help => self.renderer.panel(HELP_TITLE, HELP_TEXT),
            CommandKind::List => self.handle_list(args),
            CommandKind::Open => self.handle_open(args),
            CommandKind::New => self.handle_new(args),
            CommandKind::Info => self.handle_info(),
            CommandKind::Close => self.handle_close(),
            CommandKind::Init => self.handle_init(args),
            CommandKind::Edit => self.handle_edit(),
            CommandKind::Save => self.handle_save(),
            CommandKind::Ai => self.handle_ai(args),
        }
        LineOutcome::Continue
    }

    /// Root of the active workspace, or an error line when there is none.
    fn require_workspace_root(&mut self) -> Option<PathBuf> {
        match &self.workspace {
            Some(ws) => Some(ws.root().to_path_buf()),
            None => {
                self.renderer
                    .error("No active workspace. Use /init to initialize a workspace.");
                None
            }
        }
    }

    async fn forward_to_agent(&mut self, text: &str) {
        self.renderer.info("Sending request to AI agent...");
        let prompt = match &self.active {
            Some(active) => format!(
                "{}\n\nCurrent Document Context ({}):\n{}",
                text,
                active.document.name(),
                active.document.body()
            ),
            None => text.to_string(),
        };

        let result = self.agent.interact(&prompt, &self.config.user_id).await;
        match result {
            Ok(reply) => self.renderer.markdown(&reply),
            Err(e) => {
                warn!(error = %e, "Agent interaction failed");
                self.renderer
                    .error(&format!("Error interacting with AI agent: {}", e));
            }
        }
    }

    fn handle_list(&mut self, args: &str) {
        let Some(root) = self.require_workspace_root() else {
            return;
        };
        let pattern = match args.trim() {
            "" => crate::document::discovery::DEFAULT_PATTERN,
            pattern => pattern,
        };
        self.renderer
            .info(&format!("Listing documents matching pattern: {}", pattern));

        let mut documents = match find_documents(&root, Some(pattern)) {
            Ok(documents) => documents,
            Err(e) => {
                self.renderer.error(&format!("Error listing documents: {}", e));
                return;
            }
        };
        if documents.is_empty() {
            self.renderer.info("No documents found.");
            return;
        }

        documents.sort_by_key(|doc| doc.name());
        let rows = documents
            .iter()
            .map(|doc| {
                vec![
                    doc.name(),
                    doc.doctype().unwrap_or_else(|| "unknown".to_string()),
                    relative_display(doc.path(), &root),
                ]
            })
            .collect();
        self.renderer.table(
            &format!("Documents in {}", root.display()),
            &["Name", "Type", "Path"],
            rows,
        );
        self.renderer
            .info(&format!("Found {} document(s)", documents.len()));
    }

    fn handle_open(&mut self, args: &str) {
        let Some(root) = self.require_workspace_root() else {
            return;
        };
        let input = args.trim();
        if input.is_empty() {
            self.reload_active();
            return;
        }

        let active_path = self.active.as_ref().map(|a| a.document.path().to_path_buf());
        let Some(target) = resolve_document_path(input, &root, active_path.as_deref()) else {
            self.renderer.error("Invalid path provided.");
            return;
        };
        let path = target.path;

        if !path.exists() {
            if target.from_wikilink {
                self.renderer.info(&format!(
                    "Creating new document from WikiLink: {}",
                    path.display()
                ));
                self.create_and_open(&path, "Error creating document from WikiLink");
            } else {
                self.renderer
                    .error(&format!("Document not found: {}", path.display()));
                self.renderer.info("Use /new to create a new document.");
            }
            return;
        }

        if active_path.is_some_and(|active| same_file(&active, &path)) {
            self.renderer
                .info(&format!("Document '{}' is already open.", file_name(&path)));
            return;
        }

        match Document::load(&path) {
            Ok(document) => {
                let body = document.body().to_string();
                self.activate(document);
                self.renderer
                    .success(&format!("Opened document: {}", file_name(&path)));
                self.renderer.markdown(&body);
            }
            Err(e) => self
                .renderer
                .error(&format!("Error opening document: {}", e)),
        }
    }

    fn reload_active(&mut self) {
        let Some(path) = self.active.as_ref().map(|a| a.document.path().to_path_buf()) else {
            self.renderer
                .error("Missing document path. Usage: /open <path>");
            return;
        };
        match Document::load(&path) {
            Ok(document) => {
                let body = document.body().to_string();
                self.activate(document);
                self.renderer
                    .success(&format!("Reloaded document: {}", file_name(&path)));
                self.renderer.markdown(&body);
            }
            Err(e) => self
                .renderer
                .error(&format!("Error reloading document: {}", e)),
        }
    }

    /// Create an empty document at `path`, save it, and make it active.
    fn create_and_open(&mut self, path: &Path, error_context: &str) {
        let document = Document::create_empty(path, None, None);
        if let Err(e) = document.save() {
            self.renderer.error(&format!("{}: {}", error_context, e));
            return;
        }
        let body = document.body().to_string();
        self.activate(document);
        self.renderer.success(&format!(
            "Created and opened new document: {}",
            file_name(path)
        ));
        self.renderer.markdown(&body);
    }

    fn handle_new(&mut self, args: &str) {
        let Some(root) = self.require_workspace_root() else {
            return;
        };
        let input = args.trim();
        if input.is_empty() {
            self.renderer
                .error("Missing document path. Usage: /new <path>");
            return;
        }
        let path = Path::new(input);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        };
        if path.exists() {
            self.renderer
                .error(&format!("Document already exists: {}", path.display()));
            self.renderer.info("Use /open to open an existing document.");
            return;
        }
        self.create_and_open(&path, "Error creating document");
    }

    fn handle_info(&mut self) {
        let Some(active) = &self.active else {
            self.renderer
                .error("No active document. Use /open or /new to open a document.");
            return;
        };
        let document = &active.document;

        let mut rows = vec![
            vec!["Name".to_string(), document.name()],
            vec!["Path".to_string(), document.path().display().to_string()],
            vec![
                "Type".to_string(),
                active.doctype().unwrap_or("unknown").to_string(),
            ],
        ];
        if let Some(agent) = active.agent() {
            rows.push(vec!["Agent".to_string(), agent.to_string()]);
        }
        for (key, value) in document.metadata() {
            if key == "doctype" || key == "agent" {
                continue;
            }
            let shown = value_to_string(value).unwrap_or_else(|| {
                serde_yaml::to_string(value)
                    .map(|s| s.trim_end().to_string())
                    .unwrap_or_default()
            });
            rows.push(vec![key.clone(), shown]);
        }
        let preview = preview(document.body());

        self.renderer
            .table("Document Metadata", &["Property", "Value"], rows);
        if let Some(preview) = preview {
            self.renderer.panel("Content Preview", &preview);
        }
    }

    fn handle_close(&mut self) {
        match self.active.take() {
            Some(active) => self
                .renderer
                .success(&format!("Closed document: {}", active.document.name())),
            None => self.renderer.error("No active document to close."),
        }
    }

    fn handle_init(&mut self, args: &str) {
        let raw = match args.trim() {
            "" => ".",
            other => other,
        };
        let path = absolute_path(&expand_home(raw));

        if let Some(ws) = &self.workspace {
            let root = ws.root().to_path_buf();
            self.renderer
                .warning(&format!("Already in workspace: {}", root.display()));
            if same_file(&root, &path) {
                self.renderer.info("This is already the active workspace.");
            } else {
                self.renderer
                    .info("Use /exit and start a new REPL session to switch workspaces.");
            }
            return;
        }

        if !path.exists() {
            if let Err(e) = std::fs::create_dir_all(&path) {
                self.renderer
                    .error(&format!("Failed to create directory: {}", e));
                return;
            }
            self.renderer
                .info(&format!("Created directory: {}", path.display()));
        }
        let path = absolute_path(&path);

        if let Ok(ctx) = WorkspaceContext::acquire(Some(path.as_path())) {
            self.workspace = Some(ctx.into_inner());
            self.workspace_path = Some(path.clone());
            self.renderer
                .success(&format!("Opened existing workspace: {}", path.display()));
            return;
        }

        // Directories present but validation failed: only a rewrite can repair it.
        let repairing = Workspace::new(&path).is_initialized();
        let result = if repairing {
            info!(root = %path.display(), "Repairing invalid workspace");
            Initializer::default().reinitialize(&path, &InitOptions::default())
        } else {
            initialize_workspace(&path, &InitOptions::default())
        };
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                self.renderer.error("Failed to initialize workspace:");
                self.renderer.error(&format!("  - {}", e));
                return;
            }
        };
        match WorkspaceContext::acquire(Some(path.as_path())) {
            Ok(ctx) => {
                self.workspace = Some(ctx.into_inner());
                self.workspace_path = Some(path.clone());
                let verb = if repairing { "Repaired" } else { "Initialized new" };
                self.renderer
                    .success(&format!("{} workspace: {}", verb, path.display()));
                for message in report.messages() {
                    self.renderer.info(&message);
                }
            }
            Err(e) => self
                .renderer
                .error(&format!("Error during workspace initialization: {}", e)),
        }
    }

    fn handle_edit(&mut self) {
        let Some(active) = self.active.as_mut() else {
            self.renderer.error("No active document to edit.");
            self.renderer
                .info("Use /open <path> or /new <path> to open or create a document.");
            return;
        };
        self.renderer
            .info(&format!("Editing document: {}", active.document.name()));
        match self.editor.edit(active.document.body()) {
            Ok(Some(body)) => {
                active.document.update_body(body);
                self.renderer.success("Document content updated.");
                self.renderer.info("Use /save to save the changes to disk.");
            }
            Ok(None) => self.renderer.warning("Edit cancelled."),
            Err(e) => self.renderer.error(&format!("Error during edit: {}", e)),
        }
    }

    fn handle_save(&mut self) {
        let Some(active) = &self.active else {
            self.renderer.error("No active document to save.");
            return;
        };
        match active.document.save() {
            Ok(()) => self.renderer.success(&format!(
                "Document saved: {}",
                active.document.path().display()
            )),
            Err(e) => self
                .renderer
                .error(&format!("Error saving document: {}", e)),
        }
    }

    fn handle_ai(&mut self, args: &str) {
        let args = args.trim();
        let (sub, rest) = match args.split_once(char::is_whitespace) {
            Some((sub, rest)) => (sub, rest.trim_start()),
            None => (args, ""),
        };
        match sub.to_lowercase().as_str() {
            "" | "info" => self.show_ai_info(),
            "settings" => self.handle_ai_settings(rest),
            other => {
                self.renderer
                    .error(&format!("Unknown AI subcommand: {}", other));
                self.renderer.info("Available subcommands: info, settings");
            }
        }
    }

    fn show_ai_info(&mut self) {
        let mut rows = vec![
            vec!["Service".to_string(), self.agent.service_name().to_string()],
            vec!["Model".to_string(), self.agent.model_name().to_string()],
        ];
        rows.extend(
            self.agent_settings
                .display_pairs()
                .into_iter()
                .map(|(key, value)| vec![key, value]),
        );
        self.renderer
            .table("AI Service Information", &["Property", "Value"], rows);
        self.renderer
            .info("Use '/ai settings <key>=<value>' to configure the AI service");
        self.renderer.panel(
            "AI Configuration Examples",
            "Examples:\n/ai settings model=gemini-1.5-pro\n/ai settings temperature=0.7",
        );
    }

    fn handle_ai_settings(&mut self, args: &str) {
        if args.is_empty() {
            self.show_ai_info();
            return;
        }

        let mut parsed: Vec<(String, SettingValue)> = Vec::new();
        for pair in args.split_whitespace() {
            match pair.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    parsed.push((key.to_string(), parse_setting_value(value)));
                }
                _ => self.renderer.error(&format!(
                    "Invalid setting format: {}. Use key=value",
                    pair
                )),
            }
        }
        if parsed.is_empty() {
            self.renderer.error("No valid settings provided");
            return;
        }

        let mut updated = self.agent_settings.clone();
        let mut applied = 0;
        for (key, value) in parsed {
            match updated.apply(&key, value) {
                Ok(()) => applied += 1,
                Err(e) => self.renderer.error(&format!("Invalid setting {}: {}", key, e)),
            }
        }
        if applied == 0 {
            self.renderer.error("No valid settings provided");
            return;
        }

        match build_agent(&updated) {
            Ok(agent) => {
                self.agent = agent;
                self.agent_settings = updated;
                self.renderer.success("AI settings updated successfully");
                self.show_ai_info();
            }
            Err(e) => self
                .renderer
                .error(&format!("Error updating AI settings: {}", e)),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn same_file(a: &Path, b: &Path) -> bool {
    a == b || absolute_path(a) == absolute_path(b)
}

/// Expand a leading `~` to the home directory.
fn expand_home(raw: &str) -> PathBuf {
    let home = || directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    if raw == "~" {
        if let Some(home) = home() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = home() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

/// First `PREVIEW_CHARS` characters, with `...` when truncated. `None` for an empty body.
fn preview(body: &str) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    let mut chars = body.char_indices();
    match chars.nth(PREVIEW_CHARS) {
        Some((cut, _)) => Some(format!("{}...", &body[..cut])),
        None => Some(body.to_string()),
    }
}
