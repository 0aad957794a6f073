//! Data-source descriptors and fetchers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Where one table comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceDescriptor {
    File(PathBuf),
    /// Published spreadsheet (or any CSV endpoint) fetched with a plain GET.
    Url(String),
}

impl SourceDescriptor {
    /// `http://` and `https://` values are URLs, anything else is a file path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            SourceDescriptor::Url(trimmed.to_string())
        } else {
            SourceDescriptor::File(PathBuf::from(trimmed))
        }
    }
}

impl core::fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SourceDescriptor::File(path) => write!(f, "{}", path.display()),
            SourceDescriptor::Url(url) => f.write_str(url),
        }
    }
}

impl From<&str> for SourceDescriptor {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// The pair of sources a session reads. This is the snapshot cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerSources {
    pub items: SourceDescriptor,
    pub movements: SourceDescriptor,
}

impl LedgerSources {
    pub fn new(items: impl Into<SourceDescriptor>, movements: impl Into<SourceDescriptor>) -> Self {
        Self {
            items: items.into(),
            movements: movements.into(),
        }
    }
}

/// Raw table fetch (CSV text). No retries: one failure fails the load.
pub trait TableFetcher: Send + Sync {
    fn fetch(&self, source: &SourceDescriptor) -> Result<String, LoadError>;
}

impl<F> TableFetcher for Arc<F>
where
    F: TableFetcher + ?Sized,
{
    fn fetch(&self, source: &SourceDescriptor) -> Result<String, LoadError> {
        (**self).fetch(source)
    }
}

/// Production fetcher: local files and blocking HTTP GET.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    client: reqwest::blocking::Client,
}

impl SourceFetcher {
    /// `timeout` bounds each HTTP request (connect + body).
    pub fn new(timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::unavailable("http client", e.to_string()))?;
        Ok(Self { client })
    }

    fn fetch_url(&self, url: &str) -> Result<String, LoadError> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| LoadError::unavailable(url, e.to_string()))?;
        response
            .text()
            .map_err(|e| LoadError::unavailable(url, e.to_string()))
    }
}

impl TableFetcher for SourceFetcher {
    fn fetch(&self, source: &SourceDescriptor) -> Result<String, LoadError> {
        tracing::info!(%source, "fetching table");
        match source {
            SourceDescriptor::File(path) => std::fs::read_to_string(path)
                .map_err(|e| LoadError::unavailable(path.display().to_string(), e.to_string())),
            SourceDescriptor::Url(url) => self.fetch_url(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn descriptor_parse_detects_urls() {
        assert_eq!(
            SourceDescriptor::parse(" https://example.com/pub?output=csv "),
            SourceDescriptor::Url("https://example.com/pub?output=csv".to_string())
        );
        assert_eq!(
            SourceDescriptor::parse("data/items.csv"),
            SourceDescriptor::File(PathBuf::from("data/items.csv"))
        );
    }

    #[test]
    fn file_fetch_reads_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Item ID,Name\nA,Gloves\n").unwrap();

        let fetcher = SourceFetcher::new(Duration::from_secs(5)).unwrap();
        let text = fetcher
            .fetch(&SourceDescriptor::File(file.path().to_path_buf()))
            .unwrap();
        assert!(text.starts_with("Item ID,Name"));
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = SourceFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher
            .fetch(&SourceDescriptor::File(dir.path().join("absent.csv")))
            .unwrap_err();
        assert!(err.is_data_unavailable());
    }
}
