use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::link::local_resource_url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Accepts English names and the usual Chinese labels.
    #[must_use]
    pub fn from_str_loose(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "easy" | "简单" => Some(Self::Easy),
            "medium" | "中等" => Some(Self::Medium),
            "hard" | "困难" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry. Owned by catalog management; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: u64,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_difficulty")]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// External judge slug, when the problem mirrors a known page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl Problem {
    pub fn new(id: u64, title: impl Into<String>, difficulty: Option<Difficulty>) -> Self {
        Self {
            id,
            title: title.into(),
            difficulty,
            description: String::new(),
            company: None,
            department: None,
            slug: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn resource_url(&self, base_url: &str) -> String {
        local_resource_url(base_url, self.id)
    }

    #[must_use]
    pub fn difficulty_label(&self) -> &'static str {
        self.difficulty.as_ref().map_or("-", Difficulty::as_str)
    }
}

// Unknown or blank difficulty strings become "unset" instead of failing the whole catalog.
fn deserialize_difficulty<'de, D>(deserializer: D) -> Result<Option<Difficulty>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Difficulty::from_str_loose))
}

/// Read interface onto the persisted problem collection.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Problem>>;

    async fn find_by_id(&self, id: u64) -> Result<Option<Problem>>;
}

/// Immutable snapshot of the catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    problems: Vec<Problem>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new(problems: Vec<Problem>) -> Self {
        Self { problems }
    }

    /// Loads a JSON or YAML list of problems, chosen by file extension.
    #[instrument(name = "catalog.load", skip_all, fields(path = %path.display()))]
    pub async fn from_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read catalog {}", path.display()))?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let problems: Vec<Problem> = if is_yaml {
            serde_yaml::from_str(&raw)
                .with_context(|| format!("invalid YAML catalog {}", path.display()))?
        } else {
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid JSON catalog {}", path.display()))?
        };

        debug!(count = problems.len(), "catalog loaded");
        Ok(Self::new(problems))
    }

    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn list_all(&self) -> Result<Vec<Problem>> {
        Ok(self.problems.clone())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Problem>> {
        Ok(self.problems.iter().find(|problem| problem.id == id).cloned())
    }
}

/// Uniform pick over the whole catalog.
#[must_use]
pub fn random_problem(problems: &[Problem]) -> Option<&Problem> {
    problems.choose(&mut rand::thread_rng())
}

/// First problem, in catalog order, whose title contains `keyword` ignoring case.
///
/// Whitespace is ignored on both sides so "LRU缓存" still finds "LRU 缓存". This is
/// a containment test, not relevance ranking: an earlier entry always wins.
#[must_use]
pub fn find_by_title_substring<'a>(problems: &'a [Problem], keyword: &str) -> Option<&'a Problem> {
    let needle = fold_title(keyword);
    if needle.is_empty() {
        return None;
    }
    problems
        .iter()
        .find(|problem| fold_title(&problem.title).contains(&needle))
}

#[must_use]
pub fn list_by_difficulty(problems: &[Problem], difficulty: Difficulty) -> Vec<&Problem> {
    problems
        .iter()
        .filter(|problem| problem.difficulty == Some(difficulty))
        .collect()
}

fn fold_title(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
