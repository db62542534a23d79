//! hallscope math utilities.

pub mod math;

pub use math::binomial::{log_pmf, log_pmf_rate, rate_to_prob, LOG_PMF_FLOOR};
pub use math::stable::*;
pub use math::stats::{mean, percentile_sorted, SampleSummary};
