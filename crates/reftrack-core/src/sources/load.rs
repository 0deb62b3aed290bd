//! Loading source tables from JSON or TOML text and files.

use std::path::Path;

use super::SourceTable;
use crate::error::ConfigError;

impl SourceTable {
    /// Parse a JSON table. `origin` names the input in error messages.
    pub fn from_json_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Parse a TOML table, e.g.
    ///
    /// ```toml
    /// [search.Intranet]
    /// domains = ["search.corp.example"]
    /// parameters = ["q"]
    /// ```
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Load a table from disk, picking the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let text = match format.as_deref() {
            Some("json") | Some("toml") => {
                std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        let origin = path.display().to_string();
        let table = if format.as_deref() == Some("json") {
            Self::from_json_str(&text, &origin)?
        } else {
            Self::from_toml_str(&text, &origin)?
        };
        tracing::debug!(
            path = %path.display(),
            mediums = table.medium_count(),
            sources = table.source_count(),
            "loaded source table"
        );
        Ok(table)
    }
}
