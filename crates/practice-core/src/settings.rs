use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use directories::ProjectDirs;
use practice_search_client::SearchSettings;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mapping::MatchPolicy;

pub const ENV_PREFIX: &str = "PRACTICE";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefix of local practice URLs.
    pub base_url: String,
    /// JSON or YAML list of problems; absent means an empty catalog.
    pub catalog_path: Option<PathBuf>,
    pub mapping_policy: MatchPolicy,
    pub search: SearchSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog_path: None,
            mapping_policy: MatchPolicy::default(),
            search: SearchSettings::default(),
        }
    }
}

impl Settings {
    /// Loads the settings file (explicit path, else the per-user config dir) and
    /// then `PRACTICE_*` environment variables on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(default_settings_path);
        Self::from_sources(path.as_deref(), environment())
    }

    pub(crate) fn from_sources(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!(path = %path.display(), "reading settings file");
            builder = builder.add_source(File::from(path).required(false));
        }
        let settings: Self = builder
            .add_source(env)
            .build()
            .context("failed to assemble settings")?
            .try_deserialize()
            .context("invalid settings")?;
        Ok(settings.normalized())
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        self.base_url = if trimmed.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            trimmed.to_string()
        };
        self
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "PracticeLink", "practice-link")
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}
