//! Configuration validation errors and semantic validation.

use crate::catalog::{ForecastDefaults, MachineSpec, Payout, ReferenceSpec, SpecCatalog};
use crate::priors::{Prior, SignalWeights};
use std::collections::BTreeSet;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

impl From<ValidationError> for hs_common::Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidValue { .. } => hs_common::Error::InvalidSpec(err.to_string()),
            other => hs_common::Error::Config(other.to_string()),
        }
    }
}

/// Validate a catalog semantically.
pub fn validate_catalog(catalog: &SpecCatalog) -> ValidationResult<()> {
    if catalog.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: catalog.schema_version.clone(),
        });
    }

    if catalog.machines.is_empty() {
        return Err(ValidationError::SemanticError(
            "catalog contains no machines".to_string(),
        ));
    }

    let mut seen = BTreeSet::new();
    for machine in &catalog.machines {
        if !seen.insert(machine.name.trim()) {
            return Err(ValidationError::SemanticError(format!(
                "duplicate machine name: {}",
                machine.name
            )));
        }
        validate_machine(machine)?;
    }

    validate_forecast_defaults(&catalog.forecast)
}

fn validate_machine(machine: &MachineSpec) -> ValidationResult<()> {
    if machine.name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "machines[].name".to_string(),
            message: "Must not be empty".to_string(),
        });
    }
    if machine.settings.is_empty() {
        return Err(ValidationError::SemanticError(format!(
            "machine {} has no settings",
            machine.name
        )));
    }
    for (setting, spec) in &machine.settings {
        validate_reference_spec(&format!("{}.{}", machine.name, setting), spec)?;
    }
    if let Some(payout) = &machine.payout {
        validate_payout(&format!("{}.payout", machine.name), payout)?;
    }
    Ok(())
}

fn validate_reference_spec(field: &str, spec: &ReferenceSpec) -> ValidationResult<()> {
    validate_rate(&format!("{field}.big"), spec.big)?;
    validate_rate(&format!("{field}.reg_total"), spec.reg_total)?;
    if let Some(grape) = spec.grape {
        validate_rate(&format!("{field}.grape"), grape)?;
    }
    if let Some(p) = spec.suika_cz_rate {
        if !(p > 0.0 && p < 1.0) {
            return Err(ValidationError::InvalidValue {
                field: format!("{field}.suika_cz_rate"),
                message: format!("Must be a probability in (0, 1), got {p}"),
            });
        }
    }
    for (id, rate) in &spec.extras {
        if id.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("{field}.extras"),
                message: "Extra ids must not be empty".to_string(),
            });
        }
        validate_rate(&format!("{field}.extras.{id}"), *rate)?;
    }
    if let Some(rate) = spec.payout_rate {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: format!("{field}.payout_rate"),
                message: format!("Must be positive, got {rate}"),
            });
        }
    }
    Ok(())
}

/// A "1 in N" rate must be finite and at least 1.
fn validate_rate(field: &str, rate: f64) -> ValidationResult<()> {
    if !rate.is_finite() || rate < 1.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be a finite '1 in N' rate with N >= 1, got {rate}"),
        });
    }
    Ok(())
}

fn validate_payout(field: &str, payout: &Payout) -> ValidationResult<()> {
    if payout.avg_big < 0 || payout.avg_reg < 0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!(
                "Payouts must be non-negative (avg_big={}, avg_reg={})",
                payout.avg_big, payout.avg_reg
            ),
        });
    }
    Ok(())
}

fn validate_forecast_defaults(defaults: &ForecastDefaults) -> ValidationResult<()> {
    if defaults.n_sims == 0 {
        return Err(ValidationError::InvalidValue {
            field: "forecast.n_sims".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }
    if defaults.bet_per_game < 0 {
        return Err(ValidationError::InvalidValue {
            field: "forecast.bet_per_game".to_string(),
            message: format!("Must be non-negative, got {}", defaults.bet_per_game),
        });
    }
    if defaults.horizons.is_empty() || defaults.horizons.contains(&0) {
        return Err(ValidationError::InvalidValue {
            field: "forecast.horizons".to_string(),
            message: "Must list at least one positive horizon".to_string(),
        });
    }
    if defaults.histogram_clip <= 0 {
        return Err(ValidationError::InvalidValue {
            field: "forecast.histogram_clip".to_string(),
            message: format!("Must be positive, got {}", defaults.histogram_clip),
        });
    }
    validate_payout("forecast.payout", &defaults.payout)
}

/// Validate signal weights: finite and non-negative.
pub fn validate_weights(weights: &SignalWeights) -> ValidationResult<()> {
    for (name, value) in [
        ("total", weights.total),
        ("big", weights.big),
        ("grape", weights.grape),
        ("suika_cz", weights.suika_cz),
        ("extra", weights.extra),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("weights.{name}"),
                message: format!("Must be finite and >= 0, got {value}"),
            });
        }
    }
    Ok(())
}

/// Validate prior weights: finite and non-negative.
pub fn validate_prior(prior: &Prior) -> ValidationResult<()> {
    for (setting, weight) in prior.iter() {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("prior.{setting}"),
                message: format!("Must be finite and >= 0, got {weight}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::builtin_catalog;
    use hs_common::Setting;

    #[test]
    fn test_rate_validation() {
        assert!(validate_rate("x", 1.0).is_ok());
        assert!(validate_rate("x", 229.1).is_ok());
        assert!(validate_rate("x", 0.5).is_err());
        assert!(validate_rate("x", 0.0).is_err());
        assert!(validate_rate("x", -3.0).is_err());
        assert!(validate_rate("x", f64::NAN).is_err());
        assert!(validate_rate("x", f64::INFINITY).is_err());
    }

    #[test]
    fn test_version_mismatch() {
        let mut catalog = builtin_catalog();
        catalog.schema_version = "0.9.0".to_string();
        let err = validate_catalog(&catalog).unwrap_err();
        assert_eq!(err.code(), 66);
    }

    #[test]
    fn test_duplicate_machine_rejected() {
        let mut catalog = builtin_catalog();
        let dup = catalog.machines[0].clone();
        catalog.machines.push(dup);
        assert!(matches!(
            validate_catalog(&catalog),
            Err(ValidationError::SemanticError(_))
        ));
    }

    #[test]
    fn test_bad_grape_names_field() {
        let mut catalog = builtin_catalog();
        catalog.machines[0]
            .settings
            .get_mut(&Setting::S3)
            .unwrap()
            .grape = Some(0.0);
        let err = validate_catalog(&catalog).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("設定3.grape"), "{msg}");
        assert_eq!(err.code(), 65);
    }

    #[test]
    fn test_suika_cz_rate_is_a_probability() {
        for (p, ok) in [(0.203, true), (0.0, false), (1.0, false), (29.0, false), (f64::NAN, false)] {
            let mut catalog = builtin_catalog();
            catalog.machines[0]
                .settings
                .get_mut(&Setting::S1)
                .unwrap()
                .suika_cz_rate = Some(p);
            assert_eq!(validate_catalog(&catalog).is_ok(), ok, "rate {p}");
        }
    }

    #[test]
    fn test_empty_machine_rejected() {
        let mut catalog = builtin_catalog();
        catalog.machines[1].settings.clear();
        assert!(validate_catalog(&catalog).is_err());
    }

    #[test]
    fn test_forecast_defaults_validated() {
        let mut catalog = builtin_catalog();
        catalog.forecast.n_sims = 0;
        assert!(validate_catalog(&catalog).is_err());

        let mut catalog = builtin_catalog();
        catalog.forecast.horizons = vec![500, 0];
        assert!(validate_catalog(&catalog).is_err());
    }

    #[test]
    fn test_weights_validation() {
        assert!(validate_weights(&SignalWeights::default()).is_ok());
        let weights = SignalWeights {
            big: -0.1,
            ..SignalWeights::default()
        };
        assert!(validate_weights(&weights).is_err());
        let weights = SignalWeights {
            suika_cz: f64::NAN,
            ..SignalWeights::default()
        };
        assert!(validate_weights(&weights).is_err());
    }

    #[test]
    fn test_prior_validation() {
        assert!(validate_prior(&Prior::uniform()).is_ok());
        let prior = Prior::from_weights([(Setting::S2, f64::INFINITY)]);
        assert!(validate_prior(&prior).is_err());
    }

    #[test]
    fn test_converts_to_common_error() {
        let err: hs_common::Error = ValidationError::InvalidValue {
            field: "a".into(),
            message: "b".into(),
        }
        .into();
        assert_eq!(err.code(), 12);
    }
}
