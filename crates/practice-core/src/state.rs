use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::collaborators::{CodeRunner, ExperienceSearch, TextProducer};
use crate::resolver::ProblemResolver;
use crate::session::{InMemorySessionStore, SessionStore};

const MAX_TELEMETRY_ENTRIES: usize = 200;

/// Shared dependencies for command execution and chat.
#[derive(Clone)]
pub struct AppContext {
    pub resolver: Arc<ProblemResolver>,
    pub sessions: Arc<dyn SessionStore>,
    pub producer: Option<Arc<dyn TextProducer>>,
    pub code_runner: Option<Arc<dyn CodeRunner>>,
    pub experiences: Option<Arc<dyn ExperienceSearch>>,
    pub state: Arc<ServerState>,
}

impl AppContext {
    pub fn new(resolver: ProblemResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
            sessions: Arc::new(InMemorySessionStore::default()),
            producer: None,
            code_runner: None,
            experiences: None,
            state: Arc::new(ServerState::default()),
        }
    }

    #[must_use]
    pub fn with_sessions(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = sessions;
        self
    }

    #[must_use]
    pub fn with_producer(mut self, producer: Arc<dyn TextProducer>) -> Self {
        self.producer = Some(producer);
        self
    }

    #[must_use]
    pub fn with_code_runner(mut self, runner: Arc<dyn CodeRunner>) -> Self {
        self.code_runner = Some(runner);
        self
    }

    #[must_use]
    pub fn with_experiences(mut self, experiences: Arc<dyn ExperienceSearch>) -> Self {
        self.experiences = Some(experiences);
        self
    }

    pub async fn record_telemetry(&self, entry: TelemetryEntry) {
        let mut guard = self.state.telemetry_log.lock().await;
        guard.push(entry);
        if guard.len() > MAX_TELEMETRY_ENTRIES {
            let overflow = guard.len() - MAX_TELEMETRY_ENTRIES;
            guard.drain(0..overflow);
        }
    }

    pub async fn telemetry_snapshot(&self) -> Vec<TelemetryEntry> {
        self.state.telemetry_log.lock().await.clone()
    }
}

#[derive(Default)]
pub struct ServerState {
    pub telemetry_log: Mutex<Vec<TelemetryEntry>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TelemetryEntry {
    pub command: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub latency_ms: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use practice_search_client::SearchClient;

    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::mapping::SlugMapping;

    #[tokio::test]
    async fn telemetry_log_is_bounded() {
        let resolver = ProblemResolver::new(
            Arc::new(InMemoryCatalog::default()),
            SlugMapping::default(),
            SearchClient::disabled(),
            "http://localhost:8080",
        );
        let context = AppContext::new(resolver);
        for i in 0..(MAX_TELEMETRY_ENTRIES + 15) {
            context
                .record_telemetry(TelemetryEntry {
                    command: format!("c{i}"),
                    timestamp: OffsetDateTime::now_utc(),
                    latency_ms: 0,
                    success: true,
                    metadata: None,
                    error: None,
                })
                .await;
        }
        let snapshot = context.telemetry_snapshot().await;
        assert_eq!(snapshot.len(), MAX_TELEMETRY_ENTRIES);
        assert_eq!(snapshot[0].command, "c15");
    }
}
