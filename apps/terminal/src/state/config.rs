//! # Configuration State
//!
//! Business rates and display options, loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --tax-rate 7.5                                                     │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     TALLY_TAX_RATE=7.5                                                 │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/tally/rates.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.tally.tally/rates.toml (macOS)   │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     tax 8.25, discount 10, tip 15, markup 25                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # rates.toml
//! [rates]
//! tax = 8.25
//! discount = 10
//! tip = 18
//! markup = 40
//!
//! [display]
//! group_thousands = true
//! ```
//!
//! ## Thread Safety
//! Rates can be changed during a session (`rate tip 20`), so they sit behind
//! an `RwLock`. Every formula call reads the current value.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tally_core::validation::validate_rates;
use tally_core::{BusinessFormula, BusinessRates, ValidationError};
use tracing::{debug, info};

/// Default rates, used for any value no other source sets.
pub const DEFAULT_RATES: BusinessRates = BusinessRates {
    tax_rate: 8.25,
    discount_rate: 10.0,
    tip_rate: 15.0,
    markup_rate: 25.0,
};

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// File Format
// =============================================================================

/// On-disk configuration (`rates.toml`). Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub rates: RatesSection,

    #[serde(default)]
    pub display: DisplaySection,
}

/// `[rates]` table, percentages.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RatesSection {
    pub tax: Option<f64>,
    pub discount: Option<f64>,
    pub tip: Option<f64>,
    pub markup: Option<f64>,
}

/// `[display]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplaySection {
    pub group_thousands: Option<bool>,
}

/// Rate values given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateOverrides {
    pub tax: Option<f64>,
    pub discount: Option<f64>,
    pub tip: Option<f64>,
    pub markup: Option<f64>,
}

impl RateOverrides {
    fn apply(&self, rates: &mut BusinessRates) {
        let pairs = [
            (BusinessFormula::Tax, self.tax),
            (BusinessFormula::Discount, self.discount),
            (BusinessFormula::Tip, self.tip),
            (BusinessFormula::Markup, self.markup),
        ];
        for (formula, value) in pairs {
            if let Some(rate) = value {
                rates.set_rate(formula, rate);
            }
        }
    }
}

impl From<&RatesSection> for RateOverrides {
    fn from(section: &RatesSection) -> Self {
        RateOverrides {
            tax: section.tax,
            discount: section.discount,
            tip: section.tip,
            markup: section.markup,
        }
    }
}

/// Environment variable for each formula's rate.
pub fn env_key(formula: BusinessFormula) -> &'static str {
    match formula {
        BusinessFormula::Tax => "TALLY_TAX_RATE",
        BusinessFormula::Discount => "TALLY_DISCOUNT_RATE",
        BusinessFormula::Tip => "TALLY_TIP_RATE",
        BusinessFormula::Markup => "TALLY_MARKUP_RATE",
    }
}

/// Platform config path: `<config dir>/rates.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "tally", "tally").map(|dirs| dirs.config_dir().join("rates.toml"))
}

// =============================================================================
// Config State
// =============================================================================

/// Session configuration.
#[derive(Debug)]
pub struct ConfigState {
    rates: RwLock<BusinessRates>,

    /// Render the display with thousands separators
    pub group_thousands: bool,

    /// File the configuration was read from, if any
    pub source_path: Option<PathBuf>,
}

/// Read-only view returned by config commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub rates: BusinessRates,
    pub group_thousands: bool,
    pub source_path: Option<String>,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState::new(DEFAULT_RATES)
    }
}

impl ConfigState {
    /// Creates a config with the given rates and default display options.
    pub fn new(rates: BusinessRates) -> Self {
        ConfigState {
            rates: RwLock::new(rates),
            group_thousands: true,
            source_path: None,
        }
    }

    /// Loads configuration from every source in priority order.
    ///
    /// An explicit `path` must exist; the platform default path is optional.
    pub fn load(path: Option<&Path>, overrides: &RateOverrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => Some((read_config_file(p)?, p.to_path_buf())),
            None => match default_config_path() {
                Some(p) if p.exists() => Some((read_config_file(&p)?, p)),
                _ => None,
            },
        };

        Self::resolve(file, |key| std::env::var(key).ok(), overrides)
    }

    /// Merges defaults, an optional parsed file, environment lookups and
    /// overrides, then validates the result.
    pub fn resolve<F>(
        file: Option<(ConfigFile, PathBuf)>,
        env: F,
        overrides: &RateOverrides,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rates = DEFAULT_RATES;
        let mut group_thousands = true;
        let mut source_path = None;

        if let Some((file, path)) = file {
            info!(path = %path.display(), "Loaded config file");
            RateOverrides::from(&file.rates).apply(&mut rates);
            if let Some(group) = file.display.group_thousands {
                group_thousands = group;
            }
            source_path = Some(path);
        }

        for formula in BusinessFormula::ALL {
            let key = env_key(formula);
            if let Some(raw) = env(key) {
                let rate = raw.trim().parse::<f64>().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw.clone(),
                })?;
                debug!(key, rate, "Rate from environment");
                rates.set_rate(formula, rate);
            }
        }

        overrides.apply(&mut rates);
        validate_rates(&rates)?;

        Ok(ConfigState {
            rates: RwLock::new(rates),
            group_thousands,
            source_path,
        })
    }

    /// Current rates (copied out; the lock is released on return).
    pub fn rates(&self) -> BusinessRates {
        *self.rates.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces one rate after validating it.
    pub fn set_rate(&self, formula: BusinessFormula, rate: f64) -> Result<(), ValidationError> {
        let mut candidate = self.rates();
        candidate.set_rate(formula, rate);
        validate_rates(&candidate)?;

        *self.rates.write().unwrap_or_else(PoisonError::into_inner) = candidate;
        Ok(())
    }

    pub fn response(&self) -> ConfigResponse {
        ConfigResponse {
            rates: self.rates(),
            group_thousands: self.group_thousands,
            source_path: self
                .source_path
                .as_ref()
                .map(|p| p.display().to_string()),
        }
    }
}

/// Reads and parses a config file.
pub fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text, path)
}

/// Parses config text; `path` is only used for error messages.
pub fn parse_config(text: &str, path: &Path) -> Result<ConfigFile, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn file(text: &str) -> Option<(ConfigFile, PathBuf)> {
        let path = PathBuf::from("rates.toml");
        Some((parse_config(text, &path).unwrap(), path))
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::resolve(None, no_env, &RateOverrides::default()).unwrap();
        assert_eq!(config.rates(), DEFAULT_RATES);
        assert!(config.group_thousands);
        assert!(config.source_path.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = ConfigState::resolve(
            file("[rates]\ntip = 18\n\n[display]\ngroup_thousands = false\n"),
            no_env,
            &RateOverrides::default(),
        )
        .unwrap();

        let rates = config.rates();
        assert_eq!(rates.tip_rate, 18.0);
        assert_eq!(rates.tax_rate, 8.25);
        assert!(!config.group_thousands);
        assert_eq!(config.response().source_path.as_deref(), Some("rates.toml"));
    }

    #[test]
    fn test_priority_flags_over_env_over_file() {
        let env: HashMap<&str, &str> =
            HashMap::from([("TALLY_TIP_RATE", "20"), ("TALLY_TAX_RATE", "7")]);
        let overrides = RateOverrides {
            tax: Some(6.5),
            ..Default::default()
        };

        let config = ConfigState::resolve(
            file("[rates]\ntip = 18\nmarkup = 40\n"),
            |key| env.get(key).map(|v| v.to_string()),
            &overrides,
        )
        .unwrap();

        let rates = config.rates();
        assert_eq!(rates.tax_rate, 6.5);
        assert_eq!(rates.tip_rate, 20.0);
        assert_eq!(rates.markup_rate, 40.0);
        assert_eq!(rates.discount_rate, 10.0);
    }

    #[test]
    fn test_bad_env_value() {
        let err = ConfigState::resolve(
            None,
            |key| (key == "TALLY_DISCOUNT_RATE").then(|| "ten".to_string()),
            &RateOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(err.to_string(), "Invalid value for TALLY_DISCOUNT_RATE: 'ten'");
    }

    #[test]
    fn test_out_of_range_rate_rejected() {
        let overrides = RateOverrides {
            markup: Some(-3.0),
            ..Default::default()
        };
        let err = ConfigState::resolve(None, no_env, &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = parse_config("[rates]\nvat = 20\n", Path::new("rates.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = read_config_file(Path::new("/definitely/not/here/rates.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_set_rate_validates() {
        let config = ConfigState::default();
        config.set_rate(BusinessFormula::Tip, 22.5).unwrap();
        assert_eq!(config.rates().tip_rate, 22.5);

        assert!(config.set_rate(BusinessFormula::Tip, f64::NAN).is_err());
        assert_eq!(config.rates().tip_rate, 22.5);
    }
}
