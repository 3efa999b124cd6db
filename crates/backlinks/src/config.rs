//! Backlink browser configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (`--config`, or `<vault>/.backlinks.toml` when present)
//! 3. Environment variables (BACKLINKS_* prefix)
//!
//! Command-line flags are applied last by the caller.

use anyhow::{Context, Result};
use backlink_core::navigation::{visible_line_capacity, DEFAULT_LINE_HEIGHT_PX};
use backlink_core::MatchStrategy;
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "BACKLINKS";

/// File name looked up in the vault root when no `--config` is given.
pub const VAULT_CONFIG_FILE: &str = ".backlinks.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Glob patterns (vault-relative) excluded from the corpus
    #[serde(default)]
    pub ignore: Vec<String>,

    /// How link targets are matched against note names
    #[serde(default)]
    pub strategy: MatchStrategy,

    /// Approximate rendered line height in pixels
    #[serde(default = "default_line_height")]
    pub line_height: u32,

    /// Visible viewport height in pixels
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
}

fn default_line_height() -> u32 {
    DEFAULT_LINE_HEIGHT_PX
}

fn default_viewport_height() -> u32 {
    800
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            strategy: MatchStrategy::default(),
            line_height: default_line_height(),
            viewport_height: default_viewport_height(),
        }
    }
}

impl Config {
    /// Load configuration for a vault.
    ///
    /// An explicit path must exist; the vault-local file is optional.
    pub fn load(explicit: Option<&Path>, vault: &Path) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::read_file(path)?,
            None => {
                let local = vault.join(VAULT_CONFIG_FILE);
                if local.exists() {
                    Self::read_file(&local)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse configuration from a TOML string without environment overrides.
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content).context("Failed to parse config TOML")
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::load_from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Apply `BACKLINKS_*` overrides using `lookup` to read variables.
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(&format!("{}_STRATEGY", ENV_PREFIX)) {
            match val.parse() {
                Ok(strategy) => self.strategy = strategy,
                Err(e) => tracing::warn!("Ignoring {}_STRATEGY: {}", ENV_PREFIX, e),
            }
        }

        if let Some(val) = lookup(&format!("{}_LINE_HEIGHT", ENV_PREFIX)) {
            match val.parse() {
                Ok(px) => self.line_height = px,
                Err(e) => tracing::warn!("Ignoring {}_LINE_HEIGHT={}: {}", ENV_PREFIX, val, e),
            }
        }

        if let Some(val) = lookup(&format!("{}_VIEWPORT_HEIGHT", ENV_PREFIX)) {
            match val.parse() {
                Ok(px) => self.viewport_height = px,
                Err(e) => tracing::warn!("Ignoring {}_VIEWPORT_HEIGHT={}: {}", ENV_PREFIX, val, e),
            }
        }

        if let Some(val) = lookup(&format!("{}_IGNORE", ENV_PREFIX)) {
            self.ignore = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
    }

    /// Lines visible in the configured viewport.
    pub fn visible_lines(&self) -> usize {
        visible_line_capacity(self.viewport_height, self.line_height)
    }
}
