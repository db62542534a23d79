//! Catalog loading for hallscope.
//!
//! This module handles:
//! - Locating the catalog (CLI > env > XDG > built-in)
//! - Parsing JSON or TOML by file extension
//! - Semantic validation
//! - Snapshot generation for report provenance

pub use hs_config::validate::ValidationError;
pub use hs_config::{
    CatalogSnapshot, CatalogSource, ForecastDefaults, MachineSpec, Payout, Prior, ReferenceSpec,
    SignalWeights, SpecCatalog, CONFIG_SCHEMA_VERSION,
};

use hs_config::builtin::builtin_catalog;
use hs_config::resolve::resolve_catalog_path;
use hs_config::snapshot::hash_content;
use hs_config::validate::validate_catalog;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Catalog file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in catalog {path}: {source}")]
    JsonError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid TOML in catalog {path}: {source}")]
    TomlError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigError> for hs_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::IoError { source, .. } => hs_common::Error::Io(source),
            ConfigError::ValidationError(inner) => inner.into(),
            other => hs_common::Error::Config(other.to_string()),
        }
    }
}

/// Configuration resolution options.
#[derive(Debug, Default, Clone)]
pub struct ConfigOptions {
    /// Explicit catalog file (highest priority).
    pub specs_path: Option<PathBuf>,
}

/// A loaded catalog with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedCatalog {
    pub catalog: SpecCatalog,
    /// Path to the catalog file (None for the built-in catalog).
    pub path: Option<PathBuf>,
    pub source: CatalogSource,
    /// SHA-256 of the file content, or of the canonical JSON for the built-in catalog.
    pub hash: String,
}

impl ResolvedCatalog {
    /// Create a catalog snapshot for reports.
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot::new(
            &self.catalog,
            self.path.as_deref(),
            self.source,
            self.hash.clone(),
        )
    }

    /// Wrap the built-in catalog.
    pub fn builtin() -> Self {
        let catalog = builtin_catalog();
        let hash = serde_json::to_string(&catalog)
            .map(|json| hash_content(&json))
            .unwrap_or_default();
        Self {
            catalog,
            path: None,
            source: CatalogSource::Builtin,
            hash,
        }
    }
}

/// Load the catalog with the standard resolution order.
///
/// Resolution order (highest to lowest priority):
/// 1. Explicit `--specs` path (via ConfigOptions)
/// 2. `HALLSCOPE_SPECS`, then `HALLSCOPE_CONFIG_DIR/specs.{json,toml}`
/// 3. XDG config dir (`~/.config/hallscope/specs.{json,toml}`)
/// 4. Built-in catalog
pub fn load_catalog(options: &ConfigOptions) -> Result<ResolvedCatalog, ConfigError> {
    let (path, source) = resolve_catalog_path(options.specs_path.as_deref());

    let resolved = match path {
        Some(path) => {
            let (catalog, hash) = load_catalog_from_file(&path)?;
            ResolvedCatalog {
                catalog,
                path: Some(path),
                source,
                hash,
            }
        }
        None => ResolvedCatalog::builtin(),
    };

    validate_catalog(&resolved.catalog)?;

    tracing::debug!(
        source = %resolved.source,
        path = ?resolved.path,
        machines = resolved.catalog.machines.len(),
        "catalog loaded"
    );

    Ok(resolved)
}

/// Read and parse a catalog file. `.toml` files are parsed as TOML, anything
/// else as JSON.
pub fn load_catalog_from_file(path: &Path) -> Result<(SpecCatalog, String), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let hash = hash_content(&content);

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let catalog = if is_toml {
        SpecCatalog::from_toml(&content).map_err(|e| ConfigError::TomlError {
            path: path.to_path_buf(),
            source: e,
        })?
    } else {
        SpecCatalog::from_json(&content).map_err(|e| ConfigError::JsonError {
            path: path.to_path_buf(),
            source: e,
        })?
    };

    Ok((catalog, hash))
}
