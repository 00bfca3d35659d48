//! Configuration file handling for minecraftimg.
//!
//! Loads configuration from `~/.config/minecraftimg/config.toml` or a custom path.
//! The service base URL can also come from `MINECRAFTIMG_API_URL`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::i18n::Language;
use crate::selection::{BlockWidth, WidthPolicy, DEFAULT_BLOCK_WIDTH};
use crate::submission::{ConvertClient, ConvertError, API_URL_ENV, DEFAULT_API_URL, DEFAULT_TIMEOUT};

/// Configuration file structure for minecraftimg.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConvertConfig {
    pub default_width: i64,
    pub width_policy: WidthPolicy,
    pub output_dir: Option<PathBuf>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_BLOCK_WIDTH,
            width_policy: WidthPolicy::default(),
            output_dir: None,
        }
    }
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct UiConfig {
    #[serde(default)]
    pub language: Language,
}

/// Template written by `config init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# minecraftimg configuration

[api]
# Conversion service base URL (MINECRAFTIMG_API_URL overrides this)
# base_url = "http://localhost:5000"
# Whole request, upload to download. Keep above the service's 30s budget.
timeout_secs = 120
connect_timeout_secs = 10

[convert]
# Initial number of horizontal blocks
default_width = 64
# Widths outside 1-512: "pass-through", "clamp" or "reject"
width_policy = "pass-through"
# Directory minecraft.png is saved to (default: current directory)
# output_dir = "/home/me/Pictures"

[ui]
# english, french or russian
language = "english"
"#;

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Base URL with precedence: explicit override, environment, file, default.
    pub fn base_url(&self, cli_override: Option<&str>) -> String {
        cli_override
            .map(str::to_string)
            .or_else(|| {
                std::env::var(API_URL_ENV)
                    .ok()
                    .filter(|url| !url.trim().is_empty())
            })
            .or_else(|| self.api.base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn build_client(&self, cli_override: Option<&str>) -> Result<ConvertClient, ConvertError> {
        ConvertClient::with_timeouts(
            self.base_url(cli_override),
            Duration::from_secs(self.api.timeout_secs),
            Duration::from_secs(self.api.connect_timeout_secs),
        )
    }

    pub fn default_width(&self) -> BlockWidth {
        BlockWidth::new(self.convert.default_width)
    }

    /// Directory results are saved to.
    pub fn output_dir(&self) -> PathBuf {
        self.convert
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("minecraftimg").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/minecraftimg/config.toml")
        })
}
