//! Centralized configuration management for fastcodal

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Symbol downloaded when nothing else is configured
pub const DEFAULT_SYMBOL: &str = "کاردان";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Symbols to download, processed in order
    pub symbols: Vec<String>,
    /// Base directory; each symbol gets its own subdirectory
    pub download_dir: PathBuf,
    /// Codal endpoints
    pub codal: CodalEndpoints,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// Codal service endpoints
#[derive(Debug, Clone)]
pub struct CodalEndpoints {
    /// Paginated search API
    pub search_url: String,
    /// Host serving landing pages and `Reports/DownloadFile.aspx`
    pub report_base_url: String,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// User agent string
    pub user_agent: String,
    /// Extra headers sent with every request
    pub headers: Vec<(String, String)>,
    /// Request timeout in seconds, client default when unset
    pub timeout_seconds: Option<u64>,
}

impl Default for CodalEndpoints {
    fn default() -> Self {
        Self {
            search_url: "https://search.codal.ir/api/search/v2/q".to_string(),
            report_base_url: "https://www.codal.ir".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/111.0"
                .to_string(),
            headers: Vec::new(),
            timeout_seconds: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: vec![DEFAULT_SYMBOL.to_string()],
            download_dir: default_download_dir(),
            codal: CodalEndpoints::default(),
            http: HttpConfig::default(),
        }
    }
}

impl HttpConfig {
    /// Get HTTP timeout as Duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let symbols = match std::env::var("FASTCODAL_SYMBOLS") {
            Ok(val) => parse_symbols(&val),
            Err(_) => defaults.symbols,
        };

        let download_dir = std::env::var("FASTCODAL_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.download_dir);

        let codal = CodalEndpoints {
            search_url: std::env::var("FASTCODAL_SEARCH_URL").unwrap_or(defaults.codal.search_url),
            report_base_url: std::env::var("FASTCODAL_REPORT_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.codal.report_base_url),
        };

        let http = HttpConfig {
            user_agent: std::env::var("FASTCODAL_USER_AGENT").unwrap_or(defaults.http.user_agent),
            headers: Vec::new(),
            timeout_seconds: parse_env_var("FASTCODAL_HTTP_TIMEOUT_SECONDS")?,
        };

        Ok(Config {
            symbols,
            download_dir,
            codal,
            http,
        })
    }

    /// Add a header given as `Name: value`
    pub fn add_header(&mut self, raw: &str) -> Result<()> {
        let (name, value) = raw
            .split_once(':')
            .with_context(|| format!("Header must look like 'Name: value', got '{}'", raw))?;
        self.http
            .headers
            .push((name.trim().to_string(), value.trim().to_string()));
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            anyhow::bail!("No symbols configured");
        }

        if self.http.timeout_seconds == Some(0) {
            anyhow::bail!("HTTP timeout must be greater than zero");
        }

        std::fs::create_dir_all(&self.download_dir).with_context(|| {
            format!("Cannot create download directory: {}", self.download_dir.display())
        })?;

        Ok(())
    }
}

fn default_download_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join("Downloads"))
        .unwrap_or_else(|| PathBuf::from("./downloads"))
}

fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
