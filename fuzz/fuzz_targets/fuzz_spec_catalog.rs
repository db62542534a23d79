//! Fuzz target for catalog parsing and validation.
//!
//! Tests that JSON and TOML catalog parsing handles arbitrary input without
//! panicking, and that validation accepts or rejects whatever parses.

#![no_main]

use hs_config::validate::validate_catalog;
use hs_config::SpecCatalog;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(catalog) = SpecCatalog::from_json(data) {
        let _ = validate_catalog(&catalog);
    }
    if let Ok(catalog) = SpecCatalog::from_toml(data) {
        let _ = validate_catalog(&catalog);
    }
});
