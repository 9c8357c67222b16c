use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Caller-side settings: where category pages live and how to fetch them.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: General,
    pub source: Source,
    /// Category label to page path (or absolute URL).
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct General {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for General {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Source {
    pub base_url: String,
    pub user_agent: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        Self::parse(&contents).with_context(|| format!("parsing {path}"))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn url_for(&self, category: &str) -> Option<String> {
        let target = self.categories.get(category)?;
        if target.starts_with("http://") || target.starts_with("https://") {
            return Some(target.clone());
        }
        Some(format!(
            "{}/{}",
            self.source.base_url.trim_end_matches('/'),
            target.trim_start_matches('/')
        ))
    }
}
