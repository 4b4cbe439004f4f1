//! Configuration validation.
//!
//! Validates every config field before any price data is loaded.

use crate::domain::error::LevholdError;
use crate::ports::config_port::ConfigPort;

/// `code_override` stands in for `[data] code` when given.
pub fn validate_simulation_config(
    config: &dyn ConfigPort,
    code_override: Option<&str>,
) -> Result<(), LevholdError> {
    validate_initial_investment(config)?;
    validate_leverage(config)?;
    validate_data_source(config, code_override)?;
    validate_dates(config)?;
    Ok(())
}

fn require_double(config: &dyn ConfigPort, section: &str, key: &str) -> Result<f64, LevholdError> {
    let raw = config
        .get_string(section, key)
        .ok_or_else(|| LevholdError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| LevholdError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be a number"),
        })
}

fn validate_initial_investment(config: &dyn ConfigPort) -> Result<(), LevholdError> {
    let value = require_double(config, "simulation", "initial_investment")?;
    if !value.is_finite() || value <= 0.0 {
        return Err(LevholdError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "initial_investment".to_string(),
            reason: "initial_investment must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_leverage(config: &dyn ConfigPort) -> Result<(), LevholdError> {
    let value = require_double(config, "simulation", "leverage")?;
    if !value.is_finite() || value <= 0.0 {
        return Err(LevholdError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "leverage".to_string(),
            reason: "leverage must be positive and finite".to_string(),
        });
    }
    Ok(())
}

fn validate_data_source(
    config: &dyn ConfigPort,
    code_override: Option<&str>,
) -> Result<(), LevholdError> {
    let directory = config.get_string("data", "directory");
    let code = code_override
        .map(str::to_string)
        .or_else(|| config.get_string("data", "code"));

    for (key, value) in [("directory", directory), ("code", code)] {
        match value {
            Some(s) if !s.trim().is_empty() => {}
            _ => {
                return Err(LevholdError::ConfigMissing {
                    section: "data".to_string(),
                    key: key.to_string(),
                })
            }
        }
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), LevholdError> {
    let start = config.get_date("data", "start_date")?;
    let end = config.get_date("data", "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(LevholdError::ConfigInvalid {
                section: "data".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must not be after end_date".to_string(),
            });
        }
    }
    Ok(())
}
