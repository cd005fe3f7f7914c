//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     INVOICER_DATA_DIR=/srv/invoices                                    │
//! │     INVOICER_PDF_STYLE=classic                                         │
//! │     INVOICER_RATE_POLICY=clamp                                         │
//! │                                                                         │
//! │  2. TOML Config File (--config, or the platform default)               │
//! │     ~/.config/invoicer/invoicer.toml (Linux)                           │
//! │     ~/Library/Application Support/com.invoicer.invoicer/ (macOS)       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     platform data dir, permissive rates, modern style, "Rs."           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! data_dir = "/home/me/invoices"
//!
//! [rates]
//! policy = "permissive"  # permissive | clamp
//!
//! [render]
//! pdf_style = "modern"   # modern | classic | industrial | minimalist
//! currency_label = "Rs."
//!
//! [license]
//! demo = "TCG-DEMO-{year}"
//! subscription = "TCG-SUB-{year}"
//! permanent = "TCG-PERM-{year}"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use invoicer_core::{LicenseKeys, PdfStyle, RatePolicy};

pub const CONFIG_FILE: &str = "invoicer.toml";
const YEAR_PLACEHOLDER: &str = "{year}";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No config path available on this platform")]
    NoPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Where profiles.json, history.json, license.json and logos/ live.
    /// Unset means the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateSettings {
    #[serde(default)]
    pub policy: RatePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Layout used for PDF output unless `--style` overrides it.
    #[serde(default)]
    pub pdf_style: PdfStyle,

    /// Currency label printed in PDFs (ASCII only).
    #[serde(default = "default_currency_label")]
    pub currency_label: String,
}

fn default_currency_label() -> String {
    invoicer_core::money::CURRENCY_ASCII.to_string()
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            pdf_style: PdfStyle::default(),
            currency_label: default_currency_label(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub rates: RateSettings,

    #[serde(default)]
    pub render: RenderSettings,

    #[serde(default)]
    pub license: LicenseKeys,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (invoicer.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if the file is unusable.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| ConfigError::Write { path: path.clone(), source })?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|source| ConfigError::Write { path: path.clone(), source })?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let label = &self.render.currency_label;
        if label.trim().is_empty() {
            return Err(ConfigError::Invalid("render.currency_label must not be empty".into()));
        }
        if !label.is_ascii() {
            return Err(ConfigError::Invalid(format!(
                "render.currency_label must be ASCII for PDF output, got '{}'",
                label
            )));
        }

        for (name, template) in [
            ("demo", &self.license.demo),
            ("subscription", &self.license.subscription),
            ("permanent", &self.license.permanent),
        ] {
            if !template.contains(YEAR_PLACEHOLDER) {
                return Err(ConfigError::Invalid(format!(
                    "license.{} must contain {}",
                    name, YEAR_PLACEHOLDER
                )));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("INVOICER_DATA_DIR") {
            debug!(data_dir = %dir, "Overriding data directory from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Ok(style) = std::env::var("INVOICER_PDF_STYLE") {
            match style.parse() {
                Ok(parsed) => self.render.pdf_style = parsed,
                Err(e) => warn!(style = %style, error = %e, "Ignoring PDF style from environment"),
            }
        }

        if let Ok(policy) = std::env::var("INVOICER_RATE_POLICY") {
            match policy.parse() {
                Ok(parsed) => self.rates.policy = parsed,
                Err(e) => warn!(policy = %policy, error = %e, "Ignoring rate policy from environment"),
            }
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "invoicer", "invoicer")
    }

    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// The configured data directory, else the platform data directory.
    pub fn data_dir(&self) -> ConfigResult<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::project_dirs()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or(ConfigError::NoPath),
        }
    }

    /// Config for a fixed data directory, ignoring files and environment.
    pub fn for_data_dir(data_dir: impl AsRef<Path>) -> Self {
        AppConfig {
            storage: StorageSettings {
                data_dir: Some(data_dir.as_ref().to_path_buf()),
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.rates.policy, RatePolicy::Permissive);
        assert_eq!(config.render.pdf_style, PdfStyle::Modern);
        assert_eq!(config.render.currency_label, "Rs.");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [rates]
            policy = "clamp"

            [render]
            pdf_style = "industrial"
            "#,
        )
        .unwrap();
        assert_eq!(config.rates.policy, RatePolicy::Clamp);
        assert_eq!(config.render.pdf_style, PdfStyle::Industrial);
        assert_eq!(config.render.currency_label, "Rs.");
        assert_eq!(config.license, LicenseKeys::default());
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.render.currency_label = "₹".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.license.demo = "FIXED-KEY".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let mut config = AppConfig::for_data_dir(dir.path());
        config.render.pdf_style = PdfStyle::Minimalist;
        config.save(Some(path.clone())).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[render]"));
        assert!(text.contains("minimalist"));

        let loaded: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[rates]\npolicy = \"sometimes\"\n").unwrap();
        assert!(matches!(AppConfig::load(Some(path)), Err(ConfigError::Parse(_))));
    }
}
