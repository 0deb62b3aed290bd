//! Classifier facade: referrer URL in, source/medium/term out.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::index::pattern::normalize_hostname;
use crate::index::{find_pathname_index, find_referer_by_pathname, ReferrerIndex};
use crate::term::extract_term;

/// Result of classifying one referrer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// The referrer URL as classified.
    pub href: String,
    pub medium: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
}

/// Classify `referrer` against `index`.
///
/// `None` means the referrer is not a known source: either its host (and every
/// parent domain) is unregistered, or no registered path prefix covers its
/// path. Callers record that as unattributed traffic, not as a failure.
pub fn parse(index: &ReferrerIndex, referrer: &Url) -> Option<Classification> {
    let hostname = normalize_hostname(referrer.host_str()?);
    let Some(paths) = find_pathname_index(&index.hosts, &hostname) else {
        tracing::trace!(host = %hostname, "referrer host not registered");
        return None;
    };
    let Some(descriptor) = find_referer_by_pathname(paths, referrer.path()) else {
        tracing::trace!(host = %hostname, path = referrer.path(), "referrer path not registered");
        return None;
    };

    Some(Classification {
        href: referrer.as_str().to_string(),
        medium: descriptor.medium.clone(),
        source: descriptor.name.clone(),
        term: extract_term(descriptor, referrer),
    })
}

impl ReferrerIndex {
    /// Shorthand for [`parse`].
    pub fn classify(&self, referrer: &Url) -> Option<Classification> {
        parse(self, referrer)
    }
}
