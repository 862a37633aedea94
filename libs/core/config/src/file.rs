//! Loading typed configuration from TOML files.

use crate::ConfigError;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Read `path` and deserialize it as TOML into `T`.
///
/// Missing tables and keys are handled by `T`'s serde attributes, so
/// optional settings should be `Option<_>` or carry `#[serde(default)]`.
pub fn load_toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_toml(path, &raw)
}

/// Deserialize already-read TOML text, attributing errors to `origin`.
pub fn parse_toml<T: DeserializeOwned>(origin: &Path, raw: &str) -> Result<T, ConfigError> {
    toml::from_str(raw).map_err(|source| ConfigError::InvalidFile {
        path: origin.to_path_buf(),
        source,
    })
}
