use std::path::PathBuf;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::core::search::client::DEFAULT_ENDPOINT_PATH;
use crate::core::search::config::{ControllerOptions, SearchVariant};
use crate::core::search::models::PAGE_SIZE;

/// Prefix of environment overrides, e.g. `CATALOG_SEARCH_SEARCH__BASE_URL`.
pub const ENV_PREFIX: &str = "CATALOG_SEARCH_";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchSettings,
    pub logging: LoggingConfig,
    pub tui: TuiConfig,
}

/// Search endpoint and controller policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Site root the endpoint path is appended to.
    pub base_url: String,
    pub endpoint_path: String,
    /// Request timeout. Unset means wait indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub variant: SearchVariant,
    /// Override the variant's category list.
    pub categories: Option<Vec<String>>,
    /// Override the variant's default category.
    pub default_category: Option<String>,
    pub page_size: u32,
}

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Override the default log directory.
    pub log_dir: Option<PathBuf>,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            request_timeout_secs: None,
            variant: SearchVariant::Standard,
            categories: None,
            default_category: None,
            page_size: PAGE_SIZE,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 50 }
    }
}

impl SearchSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Controller options for the configured variant, with overrides applied.
    pub fn controller_options(&self) -> ControllerOptions {
        let mut options = ControllerOptions::for_variant(self.variant).with_page_size(self.page_size);
        if let Some(categories) = &self.categories {
            options.categories = categories.clone();
            if !categories.contains(&options.default_category) {
                if let Some(first) = categories.first() {
                    options.default_category = first.clone();
                }
            }
        }
        if let Some(default_category) = &self.default_category {
            options.default_category = default_category.clone();
        }
        options
    }
}

/// Configuration in effect, and why defaults were used if the layered
/// sources could not be extracted.
///
/// Loading happens before logging is set up, so the outcome is kept here and
/// reported later through [`LoadedConfig::report`].
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub error: Option<figment::Error>,
}

impl LoadedConfig {
    /// Log how the configuration was resolved. Call once logging is up.
    pub fn report(&self) {
        match &self.error {
            None => tracing::debug!(path = %self.path.display(), "loaded config"),
            Some(e) => tracing::warn!(
                path = %self.path.display(),
                "failed to load config: {e}; using defaults"
            ),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, `~/.config/catalog-search/config.toml`
    /// and `CATALOG_SEARCH_*` environment variables, in that order.
    pub fn load() -> LoadedConfig {
        Self::load_from(&Self::config_path())
    }

    /// Like [`load`](Self::load) with an explicit file. Falls back to
    /// `Default` if the layered configuration is unusable.
    pub fn load_from(config_path: &std::path::Path) -> LoadedConfig {
        let (config, error) = match Self::from_figment(Self::figment(config_path)) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        };
        LoadedConfig {
            config,
            path: config_path.to_path_buf(),
            error,
        }
    }

    /// The layered configuration sources for `config_path`.
    pub fn figment(config_path: &std::path::Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }

    /// Resolved log directory (override or platform data dir).
    pub fn log_dir(&self) -> PathBuf {
        self.logging.log_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("catalog-search").join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("catalog-search").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
