//! hallscope core library
//!
//! Estimates which setting a Juggler-style slot machine is running from
//! observed play counters, and forecasts net medals over a future horizon:
//! - Catalog loading and validation
//! - Setting posterior estimation
//! - Monte Carlo payout forecast
//! - Report rendering, logging, and CLI exit codes
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod exit_codes;
pub mod forecast;
pub mod inference;
pub mod logging;
pub mod output;
