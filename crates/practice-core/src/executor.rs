use std::{sync::Arc, time::Instant};

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::intent::Command;
use crate::reply::{
    render_execution, render_experiences, render_resolution, LookupKind, EMPTY_CODE,
    EXPERIENCE_RESULTS,
};
use crate::resolver::{ResolutionQuery, ResolutionResult};
use crate::state::{AppContext, TelemetryEntry};

/// Result of one command: reply text plus the trusted resolution, if any.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutcome {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl CommandOutcome {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            resolution: None,
            metadata: None,
        }
    }

    fn resolved(result: ResolutionResult, kind: LookupKind) -> Self {
        let metadata = json!({
            "found": result.found,
            "source": result.source,
        });
        Self {
            text: render_resolution(&result, kind),
            resolution: Some(result),
            metadata: Some(metadata),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0} is not configured")]
    Unavailable(&'static str),
    #[error("command `{name}` failed: {source}")]
    Execution {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Clone)]
pub struct CommandExecutor {
    context: Arc<AppContext>,
    options: ExecutorOptions,
}

#[derive(Clone)]
struct ExecutorOptions {
    record_telemetry: bool,
}

#[derive(Clone)]
pub struct CommandExecutorBuilder {
    context: Arc<AppContext>,
    options: ExecutorOptions,
}

impl CommandExecutorBuilder {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self {
            context,
            options: ExecutorOptions {
                record_telemetry: true,
            },
        }
    }

    #[must_use]
    pub fn record_telemetry(mut self, enabled: bool) -> Self {
        self.options.record_telemetry = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> CommandExecutor {
        CommandExecutor {
            context: self.context,
            options: self.options,
        }
    }
}

impl CommandExecutor {
    pub fn builder(context: Arc<AppContext>) -> CommandExecutorBuilder {
        CommandExecutorBuilder::new(context)
    }

    pub fn context(&self) -> Arc<AppContext> {
        self.context.clone()
    }

    pub async fn execute(&self, command: &Command) -> Result<CommandOutcome, CommandError> {
        let name = command.name();
        let started = Instant::now();
        let result = self.dispatch(command).await;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if self.options.record_telemetry {
            match &result {
                Ok(outcome) => self.record_success(name, latency_ms, outcome).await,
                Err(error) => self.record_failure(name, latency_ms, error.to_string()).await,
            }
        }
        result
    }

    async fn dispatch(&self, command: &Command) -> Result<CommandOutcome, CommandError> {
        let resolver = &self.context.resolver;
        match command {
            Command::RandomLookup { difficulty } => {
                let result = match difficulty {
                    Some(difficulty) => resolver.random_by_difficulty(*difficulty).await,
                    None => resolver.resolve(&ResolutionQuery::Random).await,
                };
                Ok(CommandOutcome::resolved(result, LookupKind::Random))
            }
            Command::TitleLookup { keyword } => {
                let result = resolver.resolve(&ResolutionQuery::by_title(keyword.clone())).await;
                Ok(CommandOutcome::resolved(result, LookupKind::ByTitle))
            }
            Command::IdLookup { id } => {
                let result = resolver.resolve_id(*id).await;
                Ok(CommandOutcome::resolved(result, LookupKind::ById(*id)))
            }
            Command::RunCode { language, code } => {
                let runner = self
                    .context
                    .code_runner
                    .as_ref()
                    .ok_or(CommandError::Unavailable("code runner"))?;
                if code.trim().is_empty() {
                    return Ok(CommandOutcome::text(EMPTY_CODE));
                }
                let execution =
                    runner
                        .run(language, code)
                        .await
                        .map_err(|source| CommandError::Execution {
                            name: command.name().to_string(),
                            source,
                        })?;
                Ok(CommandOutcome::text(render_execution(&execution)).with_metadata(json!({
                    "language": language,
                    "exit_code": execution.exit_code,
                })))
            }
            Command::SearchExperiences {
                query,
                company,
                department,
            } => {
                let search = self
                    .context
                    .experiences
                    .as_ref()
                    .ok_or(CommandError::Unavailable("experience search"))?;
                let snippets = search
                    .search(
                        query,
                        company.as_deref(),
                        department.as_deref(),
                        EXPERIENCE_RESULTS,
                    )
                    .await
                    .map_err(|source| CommandError::Execution {
                        name: command.name().to_string(),
                        source,
                    })?;
                Ok(CommandOutcome::text(render_experiences(&snippets))
                    .with_metadata(json!({ "matches": snippets.len() })))
            }
        }
    }

    async fn record_success(&self, name: &str, latency_ms: u64, outcome: &CommandOutcome) {
        let metadata = outcome.metadata.clone();
        self.context
            .record_telemetry(TelemetryEntry {
                command: name.to_string(),
                timestamp: OffsetDateTime::now_utc(),
                latency_ms,
                success: true,
                metadata: metadata.clone(),
                error: None,
            })
            .await;
        info!(
            target: "practice_executor",
            command = %name,
            latency_ms,
            success = true,
            metadata = metadata.map_or_else(|| "null".to_string(), |value| value.to_string()),
            "command completed"
        );
    }

    async fn record_failure(&self, name: &str, latency_ms: u64, message: String) {
        warn!(
            target: "practice_executor",
            command = %name,
            latency_ms,
            error = %message,
            "command failed"
        );
        self.context
            .record_telemetry(TelemetryEntry {
                command: name.to_string(),
                timestamp: OffsetDateTime::now_utc(),
                latency_ms,
                success: false,
                metadata: None,
                error: Some(message),
            })
            .await;
    }
}
