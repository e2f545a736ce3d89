//! # Configuration Commands
//!
//! Reads and edits the business rates for this session. Edits are not
//! written back to the config file.

use tally_core::BusinessFormula;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{ConfigResponse, ConfigState};

/// Returns the active rates and display options.
pub fn get_config(config: &ConfigState) -> ConfigResponse {
    debug!("get_config command");
    config.response()
}

/// Changes one rate for the rest of the session.
///
/// ## Errors
/// `VALIDATION_ERROR` when the rate is not finite or outside
/// `0..=MAX_RATE_PERCENT`; the old rate stays in effect.
pub fn set_rate(
    config: &ConfigState,
    formula: BusinessFormula,
    rate: f64,
) -> Result<ConfigResponse, ApiError> {
    debug!(formula = %formula, rate = %rate, "set_rate command");
    config.set_rate(formula, rate)?;
    info!(formula = %formula, rate = %rate, "Rate updated");
    Ok(config.response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::DEFAULT_RATES;

    #[test]
    fn test_get_config_defaults() {
        let config = ConfigState::default();
        let response = get_config(&config);
        assert_eq!(response.rates, DEFAULT_RATES);
        assert!(response.group_thousands);
    }

    #[test]
    fn test_set_rate() {
        let config = ConfigState::default();
        let response = set_rate(&config, BusinessFormula::Markup, 40.0).unwrap();
        assert_eq!(response.rates.markup_rate, 40.0);

        let err = set_rate(&config, BusinessFormula::Markup, 5000.0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_config(&config).rates.markup_rate, 40.0);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(get_config(&ConfigState::default())).unwrap();
        assert_eq!(json["rates"]["taxRate"], 8.25);
        assert_eq!(json["groupThousands"], true);
        assert!(json["sourcePath"].is_null());
    }
}
