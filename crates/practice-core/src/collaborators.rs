//! Interfaces to the systems this crate consumes but does not own.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::session::Turn;

/// What the text producer sees for one conversational turn.
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    pub system_prompt: String,
    pub history: Vec<Turn>,
    pub message: String,
}

/// Generative text producer. Its output is untrusted and always sanitized.
#[async_trait]
pub trait TextProducer: Send + Sync {
    async fn produce(&self, context: &PromptContext) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub exit_code: i32,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
}

impl ExecutionResult {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Sandboxed code execution backend.
#[async_trait]
pub trait CodeRunner: Send + Sync {
    async fn run(&self, language: &str, code: &str) -> Result<ExecutionResult>;
}

/// Retrieval over stored interview experiences.
#[async_trait]
pub trait ExperienceSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        company: Option<&str>,
        department: Option<&str>,
        limit: usize,
    ) -> Result<Vec<String>>;
}
