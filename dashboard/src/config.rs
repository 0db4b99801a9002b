//! Dashboard configuration: TOML parsing, environment overrides and validation.
//!
//! Every section and key is optional; a missing file means all defaults.
//!
//! ```toml
//! [source]
//! base_url = "https://query1.finance.yahoo.com"
//! timeout_secs = 10
//!
//! [windows]
//! short_ma = 20
//! long_ma = 50
//! recent_rows = 90
//!
//! [export]
//! dir = "."
//! charts_json = false
//!
//! [logging]
//! format = "pretty"
//! ```
//!
//! Entrypoints:
//! - Parse + validate a TOML string: [`load_config_str`]
//! - Parse + validate a file: [`load_config_path`]
//! - Apply `MARKET_DATA_BASE_URL` / `STOCK_VIEWER_EXPORT_DIR`:
//!   [`DashboardConfig::apply_env_overrides`]

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, bail};
use market_data::providers::yahoo_rest::{YahooConfig, provider::DEFAULT_BASE_URL};
use metrics_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use shared_utils::env::env_override;

use crate::logging::LogFormat;

pub const BASE_URL_ENV: &str = "MARKET_DATA_BASE_URL";
pub const EXPORT_DIR_ENV: &str = "STOCK_VIEWER_EXPORT_DIR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub windows: EngineConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Market data connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        let yahoo = YahooConfig::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: yahoo.timeout.as_secs(),
            user_agent: yahoo.user_agent,
        }
    }
}

impl SourceConfig {
    pub fn to_yahoo_config(&self) -> YahooConfig {
        YahooConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
            ..YahooConfig::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory the `{TICKER}.csv` export is written to.
    pub dir: PathBuf,
    /// Also write the chart specifications as `{TICKER}.charts.json`.
    pub charts_json: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            charts_json: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl DashboardConfig {
    /// Checks value ranges that the TOML types cannot express.
    pub fn validate(&self) -> anyhow::Result<()> {
        let EngineConfig {
            short_ma,
            long_ma,
            recent_rows,
        } = self.windows;
        for (name, value) in [
            ("windows.short_ma", short_ma),
            ("windows.long_ma", long_ma),
            ("windows.recent_rows", recent_rows),
        ] {
            if value == 0 {
                bail!("{name} must be at least 1");
            }
        }
        if self.source.timeout_secs == 0 {
            bail!("source.timeout_secs must be at least 1");
        }
        if self.source.base_url.trim().is_empty() {
            bail!("source.base_url must not be empty");
        }
        Ok(())
    }

    /// Replaces values with their environment overrides, when set.
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = env_override(BASE_URL_ENV) {
            tracing::debug!(%url, "base URL overridden from environment");
            self.source.base_url = url;
        }
        if let Some(dir) = env_override(EXPORT_DIR_ENV) {
            tracing::debug!(%dir, "export directory overridden from environment");
            self.export.dir = PathBuf::from(dir);
        }
    }
}

/// Parses and validates a configuration TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<DashboardConfig> {
    let config: DashboardConfig =
        toml::from_str(toml_str).context("failed to parse dashboard config TOML")?;
    config.validate().context("invalid dashboard config")?;
    Ok(config)
}

/// Reads a configuration file from disk, then parses and validates it.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<DashboardConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
