//! Two-level referrer index: hostname → pathname prefix → source descriptor.
//!
//! Built once from a [`SourceTable`](crate::sources::SourceTable) at startup
//! and never mutated afterwards, so a single [`ReferrerIndex`] can be shared
//! by reference (or `Arc`) across any number of request handlers.
//!
//! Lookups go from most to least specific on both levels:
//! - hostname: full host first, then drop leading labels (`a.b.c` → `b.c` → `c`);
//! - pathname: full path first, then drop trailing segments down to `/`.

mod build;
mod lookup;
pub mod pattern;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sources::SourceTable;

pub use build::build_index;
pub use lookup::{find_pathname_index, find_referer_by_pathname};
pub use pattern::DomainPattern;

/// One registered traffic source as seen by lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Display name, e.g. "Google Product Search".
    pub name: String,
    /// Category, e.g. "search", "social".
    pub medium: String,
    /// Query parameters that carry the search term, in priority order.
    pub search_parameters: Vec<String>,
}

/// Normalized path prefix → descriptor, for one hostname.
pub type PathnameIndex = HashMap<String, SourceDescriptor>;

/// Registered hostname → its path index.
pub type HostnameIndex = HashMap<String, PathnameIndex>;

/// What to do when two entries register the same `(hostname, pathname)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the later entry and log a warning naming both sources.
    #[default]
    Warn,
    /// Abort the build.
    Error,
    /// Keep the later entry silently.
    Ignore,
}

/// Counters collected while building, for startup logs and `reftrack check`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub mediums: usize,
    pub sources: usize,
    pub hostnames: usize,
    pub patterns: usize,
    pub duplicates: usize,
}

/// Immutable, shareable lookup structure.
#[derive(Debug, Clone, Default)]
pub struct ReferrerIndex {
    pub(crate) hosts: HostnameIndex,
    pub(crate) stats: IndexStats,
}

impl ReferrerIndex {
    /// Build from a table; see [`build_index`].
    pub fn build(table: &SourceTable, policy: DuplicatePolicy) -> Result<Self, ConfigError> {
        build_index(table, policy)
    }

    pub fn hosts(&self) -> &HostnameIndex {
        &self.hosts
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Resolve an already-normalized hostname and a request path.
    pub fn resolve(&self, hostname: &str, pathname: &str) -> Option<&SourceDescriptor> {
        let paths = find_pathname_index(&self.hosts, hostname)?;
        find_referer_by_pathname(paths, pathname)
    }
}
