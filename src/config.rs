//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::coinafrique::categories::DEFAULT_ORIGIN;
use crate::coinafrique::selectors::SelectorConfig;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site origin that category and detail URLs are built on
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause between listing pages
    #[serde(default)]
    pub page_delay: DelayRange,

    /// Pause before each detail page
    #[serde(default)]
    pub detail_delay: DelayRange,

    /// Seed for User-Agent and delay choices; random when unset
    #[serde(default)]
    pub seed: Option<u64>,

    /// Number of listing pages to crawl
    #[serde(default = "default_pages")]
    pub pages: u32,

    /// Directory CSV files are saved to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// CSS selectors for page structure
    #[serde(default)]
    pub selectors: SelectorConfig,
}

fn default_base_url() -> String {
    DEFAULT_ORIGIN.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_pages() -> u32 {
    1
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/scraped")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            proxy: None,
            timeout_secs: default_timeout_secs(),
            page_delay: DelayRange::default(),
            detail_delay: DelayRange::default(),
            seed: None,
            pages: default_pages(),
            output_dir: default_output_dir(),
            format: OutputFormat::Table,
            selectors: SelectorConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("coinafrique-crawler").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(base_url) = std::env::var("COINAFRIQUE_BASE_URL") {
            self.base_url = base_url;
        }

        if let Ok(proxy) = std::env::var("COINAFRIQUE_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(seed) = std::env::var("COINAFRIQUE_SEED") {
            if let Ok(s) = seed.parse() {
                self.seed = Some(s);
            }
        }

        if let Ok(dir) = std::env::var("COINAFRIQUE_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }

        self
    }

    /// Disables both delay ranges.
    pub fn without_delays(mut self) -> Self {
        self.page_delay = DelayRange::none();
        self.detail_delay = DelayRange::none();
        self
    }

    /// Creates an RNG from the configured seed, or from OS entropy.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Inclusive range a random pause is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for DelayRange {
    fn default() -> Self {
        Self { min_ms: 1000, max_ms: 3000 }
    }
}

impl DelayRange {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A range that never sleeps.
    pub fn none() -> Self {
        Self { min_ms: 0, max_ms: 0 }
    }

    /// Draws a duration uniformly from the range. A reversed range collapses to `min_ms`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let ms = if self.max_ms > self.min_ms {
            rng.random_range(self.min_ms..=self.max_ms)
        } else {
            self.min_ms
        };
        Duration::from_millis(ms)
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
