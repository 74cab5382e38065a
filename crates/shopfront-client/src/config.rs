//! # Client Configuration
//!
//! Configuration management for the storefront client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SHOPFRONT_API_URL=https://api.example.com/api                      │
//! │     SHOPFRONT_DEMO_MODE=true                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/shopfront.toml (Linux)                        │
//! │     ~/Library/Application Support/com.shopfront.storefront/... (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8000/api, demo mode off                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # shopfront.toml
//! [api]
//! base_url = "http://localhost:8000/api"
//! request_timeout_secs = 0  # 0 = no timeout
//!
//! [storage]
//! path = "/var/lib/storefront/state.json"
//!
//! [session]
//! demo_mode = false
//! logout_clears_saved_cart = false
//!
//! [site]
//! title = "TuTienda"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "shopfront.toml";

/// Platform directories for config and persisted state.
pub(crate) fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "shopfront", "storefront")
}

// =============================================================================
// API Settings
// =============================================================================

/// Where and how to reach the storefront API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every endpoint is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds). 0 disables the timeout.
    #[serde(default)]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            request_timeout_secs: 0,
        }
    }
}

impl ApiSettings {
    /// Request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Location of the persisted token and cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Explicit state file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Session Settings
// =============================================================================

/// Session behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Substitute placeholder data when the API cannot be reached.
    #[serde(default)]
    pub demo_mode: bool,

    /// Also delete the persisted cart on logout.
    #[serde(default)]
    pub logout_clears_saved_cart: bool,
}

// =============================================================================
// Site Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Page title for routes without their own.
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_title() -> String {
    shopfront_core::DEFAULT_SITE_TITLE.to_string()
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettings {
            title: default_title(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub site: SiteSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with a different API base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.api.base_url = base_url.into();
        config
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (shopfront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = url::Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "API base URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.site.title.trim().is_empty() {
            return Err(ClientError::InvalidConfig("site.title must not be empty".into()));
        }

        Ok(())
    }

    /// Applies `SHOPFRONT_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SHOPFRONT_API_URL") {
            debug!(url = %url, "Overriding API base URL from environment");
            self.api.base_url = url;
        }

        if let Some(secs) = var("SHOPFRONT_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.request_timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid request timeout in environment"),
            }
        }

        if let Some(path) = var("SHOPFRONT_STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(flag) = var("SHOPFRONT_DEMO_MODE") {
            match parse_flag(&flag) {
                Some(on) => {
                    debug!(demo_mode = on, "Overriding demo mode from environment");
                    self.session.demo_mode = on;
                }
                None => warn!(value = %flag, "Unknown demo mode flag in environment"),
            }
        }

        if let Some(flag) = var("SHOPFRONT_LOGOUT_CLEARS_SAVED_CART") {
            match parse_flag(&flag) {
                Some(on) => self.session.logout_clears_saved_cart = on,
                None => warn!(value = %flag, "Unknown logout flag in environment"),
            }
        }

        if let Some(title) = var("SHOPFRONT_SITE_TITLE") {
            self.site.title = title;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    pub fn is_demo_mode(&self) -> bool {
        self.session.demo_mode
    }

    pub fn site_title(&self) -> &str {
        &self.site.title
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
