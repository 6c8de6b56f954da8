//! # Application Configuration
//!
//! Settings for the Fluxo back end, read once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FLUXO_BUSINESS_NAME="Padaria Central"                              │
//! │     FLUXO_PAGE_SIZE=25                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/fluxo/fluxo.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.fluxo.app/fluxo.toml (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     page_size = 10, 22 working days, 8 hours/day                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # fluxo.toml
//! [business]
//! name = "Padaria Central"
//! document = "12.345.678/0001-95"
//!
//! [ledger]
//! page_size = 10
//!
//! [pricing]
//! working_days_per_month = 22
//! hours_per_day = 8
//! default_margin_percent = 30
//!
//! [logging]
//! filter = "info,fluxo=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use fluxo_core::document::Document;
use fluxo_core::pagination::DEFAULT_PAGE_SIZE;

use crate::error::{AppError, AppResult};

/// Largest page a list screen may request.
pub const MAX_PAGE_SIZE: usize = 100;

// =============================================================================
// Business Settings
// =============================================================================

/// Identity of the business the books belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessSettings {
    #[serde(default = "default_business_name")]
    pub name: String,

    /// CNPJ (or CPF for a sole trader), masked or bare.
    #[serde(default)]
    pub document: Option<String>,
}

fn default_business_name() -> String {
    "Minha Empresa".to_string()
}

impl Default for BusinessSettings {
    fn default() -> Self {
        BusinessSettings {
            name: default_business_name(),
            document: None,
        }
    }
}

// =============================================================================
// Ledger Settings
// =============================================================================

/// List-screen behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Rows per page on ledger and contact lists.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for LedgerSettings {
    fn default() -> Self {
        LedgerSettings {
            page_size: default_page_size(),
        }
    }
}

// =============================================================================
// Pricing Settings
// =============================================================================

/// Defaults pre-filled in the pricing calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSettings {
    #[serde(default = "default_working_days")]
    pub working_days_per_month: f64,

    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,

    /// Margin in percent (30 = 30 %).
    #[serde(default = "default_margin_percent")]
    pub default_margin_percent: f64,
}

fn default_working_days() -> f64 {
    22.0
}

fn default_hours_per_day() -> f64 {
    8.0
}

fn default_margin_percent() -> f64 {
    30.0
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            working_days_per_month: default_working_days(),
            hours_per_day: default_hours_per_day(),
            default_margin_percent: default_margin_percent(),
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

pub(crate) fn default_log_filter() -> String {
    "info,fluxo=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub business: BusinessSettings,

    #[serde(default)]
    pub ledger: LedgerSettings,

    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (fluxo.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
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
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document without touching the environment.
    pub fn from_toml(contents: &str) -> AppResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> AppResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| AppError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.business.name.trim().is_empty() {
            return Err(AppError::InvalidConfig("business.name must not be empty".into()));
        }

        if let Some(ref document) = self.business.document {
            let parsed = Document::parse(document)
                .map_err(|e| AppError::InvalidConfig(format!("business.document: {}", e)))?;
            if !parsed.has_valid_check_digits() {
                return Err(AppError::InvalidConfig(format!(
                    "business.document has invalid check digits: {}",
                    document
                )));
            }
        }

        if self.ledger.page_size == 0 || self.ledger.page_size > MAX_PAGE_SIZE {
            return Err(AppError::InvalidConfig(format!(
                "ledger.page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.ledger.page_size
            )));
        }

        let pricing = &self.pricing;
        if !(pricing.working_days_per_month > 0.0 && pricing.working_days_per_month <= 31.0) {
            return Err(AppError::InvalidConfig(
                "pricing.working_days_per_month must be in (0, 31]".into(),
            ));
        }
        if !(pricing.hours_per_day > 0.0 && pricing.hours_per_day <= 24.0) {
            return Err(AppError::InvalidConfig(
                "pricing.hours_per_day must be in (0, 24]".into(),
            ));
        }
        if !pricing.default_margin_percent.is_finite() || pricing.default_margin_percent < 0.0 {
            return Err(AppError::InvalidConfig(
                "pricing.default_margin_percent must be a non-negative number".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("FLUXO_BUSINESS_NAME") {
            debug!(name = %name, "Overriding business name from environment");
            self.business.name = name;
        }

        if let Ok(document) = std::env::var("FLUXO_BUSINESS_DOCUMENT") {
            self.business.document = Some(document);
        }

        if let Ok(size) = std::env::var("FLUXO_PAGE_SIZE") {
            match size.parse::<usize>() {
                Ok(s) => {
                    debug!(page_size = s, "Overriding page size from environment");
                    self.ledger.page_size = s;
                }
                Err(_) => warn!(value = %size, "Ignoring non-numeric FLUXO_PAGE_SIZE"),
            }
        }

        if let Ok(margin) = std::env::var("FLUXO_DEFAULT_MARGIN") {
            if let Some(m) = parse_margin_override(&margin) {
                debug!(margin = m, "Overriding default margin from environment");
                self.pricing.default_margin_percent = m;
            }
        }

        if let Ok(filter) = std::env::var("FLUXO_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "fluxo", "app")
            .map(|dirs| dirs.config_dir().join("fluxo.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn page_size(&self) -> usize {
        self.ledger.page_size
    }

    pub fn business_name(&self) -> &str {
        &self.business.name
    }
}

/// Reads a `FLUXO_DEFAULT_MARGIN` value, warning when it is not a number.
fn parse_margin_override(value: &str) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(m) => Some(m),
        Err(_) => {
            warn!(value = %value, "Ignoring non-numeric FLUXO_DEFAULT_MARGIN");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin_override_parsing() {
        assert_eq!(parse_margin_override("45"), Some(45.0));
        assert_eq!(parse_margin_override(" 12.5 "), Some(12.5));
        assert_eq!(parse_margin_override("trinta"), None);
        assert_eq!(parse_margin_override(""), None);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.pricing.working_days_per_month, 22.0);
        assert_eq!(config.logging.filter, "info,fluxo=debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [business]
            name = "Padaria Central"

            [ledger]
            page_size = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.business_name(), "Padaria Central");
        assert_eq!(config.page_size(), 25);
        assert_eq!(config.pricing.hours_per_day, 8.0);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.ledger.page_size = 0;
        assert!(config.validate().is_err());
        config.ledger.page_size = MAX_PAGE_SIZE + 1;
        assert!(config.validate().is_err());
        config.ledger.page_size = 20;
        assert!(config.validate().is_ok());

        config.pricing.hours_per_day = 25.0;
        assert!(config.validate().is_err());
        config.pricing.hours_per_day = 6.0;

        config.business.document = Some("11.222.333/0001-00".to_string());
        assert!(config.validate().is_err());
        config.business.document = Some("11.222.333/0001-81".to_string());
        assert!(config.validate().is_ok());

        config.business.name = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = AppConfig::from_toml("[ledger]\npage_size = \"dez\"").unwrap_err();
        assert!(matches!(err, AppError::ConfigParse(_)));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("fluxo-config-{}", uuid::Uuid::new_v4()))
            .join("fluxo.toml");

        let mut config = AppConfig::default();
        config.business.name = "Oficina do Zé".to_string();
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[business]"));
        assert!(contents.contains("[pricing]"));

        let loaded = AppConfig::from_toml(&contents).unwrap();
        assert_eq!(loaded.business_name(), "Oficina do Zé");

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
