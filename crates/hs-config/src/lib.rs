//! hallscope configuration types and validation.
//!
//! This crate provides:
//! - Typed reference spec catalogs (machine → setting → "1 in N" rates)
//! - The built-in catalog used when no file is configured
//! - Prior and signal-weight types
//! - Catalog path resolution (CLI → env → XDG → built-in)
//! - Semantic validation and catalog snapshots

pub mod builtin;
pub mod catalog;
pub mod priors;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use catalog::{ForecastDefaults, MachineSpec, Payout, ReferenceSpec, SpecCatalog};
pub use priors::{Prior, SignalWeights};
pub use resolve::{resolve_catalog_path, CatalogSource};
pub use snapshot::CatalogSnapshot;
pub use validate::{ValidationError, ValidationResult};

/// Schema version for catalog files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
