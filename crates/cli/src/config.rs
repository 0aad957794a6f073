//! Layered configuration: optional TOML file, then `RESTOCK__*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use restock_observability::LogFormat;
use restock_reports::document::PageSetup;

pub const DEFAULT_CONFIG_FILE: &str = "restock.toml";
pub const ENV_PREFIX: &str = "RESTOCK";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestockConfig {
    pub sources: SourcesConfig,
    pub cache: CacheConfig,
    pub http: HttpConfig,
    pub plan: PlanConfig,
    pub document: DocumentConfig,
    pub log: LogConfig,
}

/// Item and movement table locations (file path or http(s) URL). No defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub items: Option<String>,
    pub movements: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Snapshot lifetime; `0` keeps it until explicitly reloaded.
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 300 }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_seconds > 0).then(|| Duration::from_secs(self.ttl_seconds))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_seconds: 30 }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub default_coverage_days: u32,
    pub comparison_window_days: u32,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            default_coverage_days: 30,
            comparison_window_days: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub rows_per_page: usize,
    pub cell_width: usize,
    /// Directory holding the PDF font files.
    pub font_dir: PathBuf,
    pub font_name: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        let page = PageSetup::default();
        Self {
            rows_per_page: page.rows_per_page,
            cell_width: page.cell_width,
            font_dir: PathBuf::from("./fonts"),
            font_name: "Roboto".to_string(),
        }
    }
}

impl DocumentConfig {
    pub fn page_setup(&self) -> PageSetup {
        PageSetup {
            rows_per_page: self.rows_per_page,
            cell_width: self.cell_width,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,
}

impl RestockConfig {
    /// Loads `path` (required) or `restock.toml` in the working directory (optional),
    /// with environment variables such as `RESTOCK__SOURCES__ITEMS` layered on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE)
                .format(FileFormat::Toml)
                .required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
