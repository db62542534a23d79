//! Catalog path resolution.
//!
//! Resolution order: CLI argument → environment variables → XDG config → built-in.

use std::path::{Path, PathBuf};

/// Where the active catalog came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in the XDG config directory.
    XdgConfig,

    /// Using the built-in catalog.
    #[default]
    Builtin,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::CliArgument => write!(f, "CLI argument"),
            CatalogSource::Environment => write!(f, "environment variable"),
            CatalogSource::XdgConfig => write!(f, "XDG config"),
            CatalogSource::Builtin => write!(f, "built-in"),
        }
    }
}

/// Environment variable naming a catalog file directly.
pub const ENV_SPECS_PATH: &str = "HALLSCOPE_SPECS";
/// Environment variable naming a directory holding `specs.json` / `specs.toml`.
pub const ENV_CONFIG_DIR: &str = "HALLSCOPE_CONFIG_DIR";

const SPEC_FILENAMES: [&str; 2] = ["specs.json", "specs.toml"];

const APP_NAME: &str = "hallscope";

/// Resolve the catalog path.
///
/// An explicit CLI path is returned even if it does not exist, so the loader
/// reports it instead of silently falling back. Every other candidate must
/// exist to be chosen. `(None, Builtin)` means "use the built-in catalog".
pub fn resolve_catalog_path(cli_path: Option<&Path>) -> (Option<PathBuf>, CatalogSource) {
    if let Some(path) = cli_path {
        return (Some(path.to_path_buf()), CatalogSource::CliArgument);
    }

    if let Ok(env_path) = std::env::var(ENV_SPECS_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return (Some(path), CatalogSource::Environment);
        }
    }

    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        if let Some(path) = find_in_dir(Path::new(&dir)) {
            return (Some(path), CatalogSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        if let Some(path) = find_in_dir(&dir) {
            return (Some(path), CatalogSource::XdgConfig);
        }
    }

    (None, CatalogSource::Builtin)
}

/// First catalog file present in `dir`, JSON preferred.
pub fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    SPEC_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// The XDG config directory for hallscope.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
