//! Tally configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tally_charts::ChartConfig;
use tally_core::Color;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tally.toml";

/// Top-level configuration (tally.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Headless render settings
#[derive(Debug, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Sample this many ms after the last scripted event; unset draws the settled frame.
    #[serde(default)]
    pub at_ms: Option<f64>,
    #[serde(default = "default_background")]
    pub background: Color,
    /// Draw the tooltip layer when a hover is active.
    #[serde(default = "default_true")]
    pub tooltip: bool,
}

fn default_background() -> Color {
    Color::WHITE
}

fn default_true() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            at_ms: None,
            background: default_background(),
            tooltip: true,
        }
    }
}

impl TallyConfig {
    /// Load `path`, or `tally.toml` from the working directory if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load_from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config
            .chart
            .validate()
            .context("Invalid [chart] configuration")?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
