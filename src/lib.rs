//! Airic: Document-Driven AI Collaboration
//!
//! A Markdown workspace manager with an interactive session. Documents carry YAML
//! frontmatter and link to each other with `[[WikiLinks]]`; the session opens, creates,
//! edits and saves them, and forwards free-form prompts to a pluggable agent.

pub mod agent;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod init;
pub mod logging;
pub mod repl;
pub mod workspace;
