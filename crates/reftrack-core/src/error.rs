//! Error types for source-table loading and index construction.
//!
//! An unmatched referrer is not an error: lookups return `Option` and callers
//! treat `None` as unattributed traffic.

use std::path::PathBuf;

use thiserror::Error;

/// A source table or domain pattern could not be turned into an index.
///
/// These are startup failures. The index is never built from a partially
/// valid table, because silently dropping sources would misattribute traffic.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A domain pattern has no usable hostname (e.g. `""`, `"/path"`).
    #[error("invalid url pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },

    /// Two entries register the same `(hostname, pathname)` key and the
    /// duplicate policy is `error`.
    #[error(
        "duplicate url pattern \"{pattern}\": registered by {previous_medium}/{previous_source} \
         and {medium}/{source_name}"
    )]
    DuplicatePattern {
        pattern: String,
        previous_medium: String,
        previous_source: String,
        medium: String,
        source_name: String,
    },

    /// A medium/source entry is structurally invalid (empty name, no domains, ...).
    #[error("invalid source table entry {medium}/{source_name}: {reason}")]
    InvalidEntry {
        medium: String,
        source_name: String,
        reason: &'static str,
    },

    /// The source table file could not be read.
    #[error("read source table {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source table text is not valid JSON/TOML for the expected schema.
    #[error("parse source table {origin}: {message}")]
    Parse { origin: String, message: String },

    /// The source table file extension is neither `.json` nor `.toml`.
    #[error("unsupported source table format: {} (expected .json or .toml)", path.display())]
    UnsupportedFormat { path: PathBuf },
}

impl ConfigError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: &'static str) -> Self {
        ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        }
    }

    pub(crate) fn invalid_entry(medium: &str, source_name: &str, reason: &'static str) -> Self {
        ConfigError::InvalidEntry {
            medium: medium.to_string(),
            source_name: source_name.to_string(),
            reason,
        }
    }
}
