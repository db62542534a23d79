//! Catalog snapshots for report provenance.
//!
//! A snapshot records which catalog a report was computed against, so two
//! reports can be compared without shipping the catalog itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::catalog::SpecCatalog;
use crate::resolve::CatalogSource;

/// A frozen description of the active catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    pub schema_version: String,

    /// Path the catalog was loaded from (None for the built-in catalog).
    #[serde(default)]
    pub path: Option<String>,

    pub source: String,

    /// SHA-256 of the catalog file content, or of its canonical JSON form for
    /// the built-in catalog.
    pub hash: String,

    pub machine_count: usize,

    pub machines: Vec<String>,
}

impl CatalogSnapshot {
    pub fn new(
        catalog: &SpecCatalog,
        path: Option<&std::path::Path>,
        source: CatalogSource,
        hash: String,
    ) -> Self {
        CatalogSnapshot {
            timestamp: Utc::now(),
            schema_version: catalog.schema_version.clone(),
            path: path.map(|p| p.display().to_string()),
            source: source.to_string(),
            hash,
            machine_count: catalog.machines.len(),
            machines: catalog.machine_names().map(str::to_string).collect(),
        }
    }
}

/// SHA-256 hex digest.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
