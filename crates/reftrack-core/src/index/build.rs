//! Compile a [`SourceTable`] into a [`ReferrerIndex`].

use super::{DomainPattern, DuplicatePolicy, ReferrerIndex, SourceDescriptor};
use crate::error::ConfigError;
use crate::sources::SourceTable;

/// Build the hostname → pathname → descriptor index.
///
/// Every domain pattern is registered under its exact hostname; no suffix
/// matching happens at build time, so `www.google.com` and
/// `google.com/products` land in separate path indexes.
///
/// The first invalid pattern aborts the build. Duplicate keys follow `policy`;
/// with `Warn` and `Ignore` the later entry (in table order) wins.
pub fn build_index(
    table: &SourceTable,
    policy: DuplicatePolicy,
) -> Result<ReferrerIndex, ConfigError> {
    table.validate()?;

    let mut index = ReferrerIndex::default();
    index.stats.mediums = table.medium_count();
    index.stats.sources = table.source_count();

    for (medium, source, entry) in table.entries() {
        for raw in &entry.domains {
            let pattern = DomainPattern::parse(raw)?;
            let descriptor = SourceDescriptor {
                name: source.to_string(),
                medium: medium.to_string(),
                search_parameters: entry.parameters.clone(),
            };
            let key = pattern.to_string();
            let paths = index.hosts.entry(pattern.hostname).or_default();
            index.stats.patterns += 1;

            if let Some(previous) = paths.insert(pattern.pathname, descriptor) {
                index.stats.duplicates += 1;
                match policy {
                    DuplicatePolicy::Error => {
                        return Err(ConfigError::DuplicatePattern {
                            pattern: key,
                            previous_medium: previous.medium,
                            previous_source: previous.name,
                            medium: medium.to_string(),
                            source_name: source.to_string(),
                        });
                    }
                    DuplicatePolicy::Warn => {
                        tracing::warn!(
                            pattern = %key,
                            replaced = %format!("{}/{}", previous.medium, previous.name),
                            by = %format!("{}/{}", medium, source),
                            "duplicate referrer pattern, later entry wins"
                        );
                    }
                    DuplicatePolicy::Ignore => {}
                }
            }
        }
    }

    index.stats.hostnames = index.hosts.len();
    tracing::debug!(
        mediums = index.stats.mediums,
        sources = index.stats.sources,
        hostnames = index.stats.hostnames,
        patterns = index.stats.patterns,
        duplicates = index.stats.duplicates,
        "referrer index built"
    );
    Ok(index)
}
