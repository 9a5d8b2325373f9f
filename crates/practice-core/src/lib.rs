use std::sync::Arc;

use anyhow::Result;
use practice_search_client::SearchClient;

pub mod catalog;
pub mod chat;
pub mod collaborators;
pub mod executor;
pub mod intent;
pub mod link;
pub mod mapping;
pub mod reply;
pub mod resolver;
pub mod sanitizer;
pub mod session;
pub mod settings;
pub mod state;
pub mod transport;
pub mod verifier;

use catalog::InMemoryCatalog;
use mapping::SlugMapping;
use resolver::ProblemResolver;
use settings::Settings;
use state::AppContext;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Configuration inputs required to bootstrap the resolver core.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub settings: Settings,
    /// Timestamp captured during process initialization for diagnostics.
    pub boot_timestamp: OffsetDateTime,
    /// How the server transports requests/responses.
    pub mode: ServerMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMode {
    Stdio,
    Headless,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            boot_timestamp: OffsetDateTime::now_utc(),
            mode: ServerMode::Stdio,
        }
    }
}

#[derive(Clone)]
pub struct CoreRuntime {
    config: ServerConfig,
    chat: ChatService,
}

impl CoreRuntime {
    pub fn executor(&self) -> CommandExecutor {
        self.chat.executor().clone()
    }

    pub fn chat(&self) -> ChatService {
        self.chat.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub async fn serve(&self) -> Result<()> {
        match self.config.mode {
            ServerMode::Stdio => transport::serve_stdio(self.chat.clone()).await?,
            ServerMode::Headless => {
                debug!(target: "practice_core", "headless mode: skipping transport loop");
            }
        }
        Ok(())
    }
}

/// Loads the catalog and wires resolver, executor and chat together.
pub async fn bootstrap(config: ServerConfig) -> Result<CoreRuntime> {
    let settings = &config.settings;
    let catalog = match &settings.catalog_path {
        Some(path) => InMemoryCatalog::from_file(path).await?,
        None => InMemoryCatalog::default(),
    };
    let catalog_size = catalog.problems().len();

    let search = SearchClient::from_settings(&settings.search);
    let resolver = ProblemResolver::new(
        Arc::new(catalog),
        SlugMapping::new(settings.mapping_policy),
        search,
        &settings.base_url,
    );

    info!(
        target: "practice_core",
        catalog_size,
        base_url = %settings.base_url,
        search_enabled = resolver.search_enabled(),
        mapping_policy = ?settings.mapping_policy,
        boot_timestamp = %config.boot_timestamp,
        mode = ?config.mode,
        "core starting"
    );

    let context = Arc::new(AppContext::new(resolver));
    let executor = CommandExecutor::builder(context).build();
    let chat = ChatService::new(executor);
    Ok(CoreRuntime { config, chat })
}

pub async fn run(config: ServerConfig) -> Result<()> {
    bootstrap(config).await?.serve().await
}

pub use catalog::{Catalog, Difficulty, Problem};
pub use chat::{ChatReply, ChatService};
pub use executor::{CommandError, CommandExecutor, CommandExecutorBuilder, CommandOutcome};
pub use intent::{classify, Command, Intent};
pub use link::{is_resource_page, LinkKind};
pub use resolver::{ResolutionQuery, ResolutionResult, ResolutionSource};
pub use sanitizer::{sanitize, sanitize_with_resolution, SanitizedResponse};

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn headless_bootstrap_loads_catalog() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("problems.json");
        std::fs::write(&path, r#"[{"id": 1, "title": "两数之和", "difficulty": "EASY"}]"#).unwrap();

        let mut config = ServerConfig::default();
        config.settings.catalog_path = Some(path);
        config.mode = ServerMode::Headless;

        let runtime = bootstrap(config).await.unwrap();
        assert!(runtime.serve().await.is_ok());
        let problems = runtime
            .executor()
            .context()
            .resolver
            .catalog()
            .list_all()
            .await
            .unwrap();
        assert_eq!(problems.len(), 1);
    }

    #[tokio::test]
    async fn missing_catalog_file_fails_bootstrap() {
        let tmp = tempdir().unwrap();
        let mut config = ServerConfig::default();
        config.settings.catalog_path = Some(tmp.path().join("absent.json"));
        config.mode = ServerMode::Headless;
        assert!(bootstrap(config).await.is_err());
    }
}
