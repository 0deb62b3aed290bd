//! Typed source table: medium → source name → domains and search parameters.
//!
//! This is the declarative input to [`crate::index::build_index`]. The built-in
//! table ships with the crate (`data/referers.json`); users can overlay their
//! own JSON or TOML table on top of it.

mod load;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Embedded default table. Same shape as the upstream referer-parser data.
const BUILTIN_TABLE: &str = include_str!("../../data/referers.json");

/// One registered traffic source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceEntry {
    /// `"hostname"` or `"hostname/path"` patterns.
    pub domains: Vec<String>,
    /// Query parameters carrying the search term, in priority order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
}

/// Sources belonging to one medium, keyed by display name.
pub type MediumSources = BTreeMap<String, SourceEntry>;

/// The full table. Ordered maps keep index construction deterministic, so
/// "last write wins" on duplicate patterns is reproducible across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceTable {
    mediums: BTreeMap<String, MediumSources>,
}

impl SourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the table embedded in the crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json_str(BUILTIN_TABLE, "builtin")
    }

    /// Register (or replace) a source under `medium`.
    pub fn insert(&mut self, medium: &str, source: &str, entry: SourceEntry) {
        self.mediums
            .entry(medium.to_string())
            .or_default()
            .insert(source.to_string(), entry);
    }

    /// Overlay `other` on `self`. Same-named sources within a medium are
    /// replaced wholesale; everything else is added.
    pub fn merge(&mut self, other: SourceTable) {
        for (medium, sources) in other.mediums {
            let target = self.mediums.entry(medium).or_default();
            for (name, entry) in sources {
                target.insert(name, entry);
            }
        }
    }

    /// Iterate `(medium, source, entry)` in build order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &SourceEntry)> {
        self.mediums.iter().flat_map(|(medium, sources)| {
            sources
                .iter()
                .map(move |(name, entry)| (medium.as_str(), name.as_str(), entry))
        })
    }

    pub fn mediums(&self) -> impl Iterator<Item = &str> {
        self.mediums.keys().map(String::as_str)
    }

    pub fn medium_count(&self) -> usize {
        self.mediums.len()
    }

    pub fn source_count(&self) -> usize {
        self.mediums.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.source_count() == 0
    }

    /// Reject structurally invalid entries, naming the first offender.
    ///
    /// Domain pattern syntax is checked later by the index builder, which
    /// reports the offending pattern itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (medium, sources) in &self.mediums {
            if medium.trim().is_empty() {
                let name = sources.keys().next().map(String::as_str).unwrap_or("");
                return Err(ConfigError::invalid_entry(medium, name, "empty medium name"));
            }
            for (name, entry) in sources {
                if name.trim().is_empty() {
                    return Err(ConfigError::invalid_entry(medium, name, "empty source name"));
                }
                if entry.domains.is_empty() {
                    return Err(ConfigError::invalid_entry(medium, name, "no domains listed"));
                }
                if entry.parameters.iter().any(|p| p.is_empty()) {
                    return Err(ConfigError::invalid_entry(
                        medium,
                        name,
                        "empty search parameter name",
                    ));
                }
            }
        }
        Ok(())
    }
}
