//! Setting inference from observed play counters.

pub mod observation;
pub mod posterior;

pub use observation::{Observation, SuikaCz};
pub use posterior::{
    checked_estimate, confidence, contribution_breakdown, estimate_setting_probs, top_n,
    Contribution, EstimateOptions, SettingPosterior,
};

use thiserror::Error;

/// Errors raised by [`checked_estimate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error("games must be greater than zero")]
    NoGames,

    #[error("invalid observation for {field}: {message}")]
    InvalidObservation { field: String, message: String },

    #[error("invalid estimate options: {message}")]
    InvalidOptions { message: String },

    #[error("no candidate settings remain")]
    NoCandidates,
}

impl From<EstimateError> for hs_common::Error {
    fn from(err: EstimateError) -> Self {
        match err {
            EstimateError::NoGames | EstimateError::NoCandidates => {
                hs_common::Error::NoEstimate(err.to_string())
            }
            EstimateError::InvalidObservation { .. } | EstimateError::InvalidOptions { .. } => {
                hs_common::Error::InvalidObservation(err.to_string())
            }
        }
    }
}
