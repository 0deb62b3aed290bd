//! Domain pattern parsing and the path normalization rule shared by the
//! builder and the resolver.
//!
//! A pattern is `hostname` or `hostname/path`. Patterns are parsed with the
//! same URL parser as referrers and both sides then go through
//! [`normalize_pathname`], so `host`, `host/` and `host//` all register at
//! `/`, and `/a/b/` matches a registration at `/a/b`.

use std::fmt;

use url::Url;

use crate::error::ConfigError;

/// A parsed `hostname[/path]` registration key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainPattern {
    pub hostname: String,
    pub pathname: String,
}

impl DomainPattern {
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        if pattern.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid_pattern(pattern, "contains whitespace"));
        }
        if pattern.contains("://") {
            return Err(ConfigError::invalid_pattern(
                pattern,
                "scheme is not allowed, use hostname[/path]",
            ));
        }
        if pattern.contains(['?', '#']) {
            return Err(ConfigError::invalid_pattern(
                pattern,
                "query or fragment is not allowed",
            ));
        }

        let (host, _) = pattern.split_once('/').unwrap_or((pattern, ""));
        if normalize_hostname(host).is_empty() {
            return Err(ConfigError::invalid_pattern(pattern, "empty hostname"));
        }
        if host.contains('@') {
            return Err(ConfigError::invalid_pattern(pattern, "userinfo is not allowed"));
        }
        if (host.contains(':') && !host.starts_with('[')) || host.contains("]:") {
            return Err(ConfigError::invalid_pattern(pattern, "port is not allowed"));
        }

        // Same parser as the referrers, so IDN hosts, percent-encoding and
        // dot segments come out identical on both sides of the lookup.
        let url = Url::parse(&format!("http://{pattern}"))
            .map_err(|_| ConfigError::invalid_pattern(pattern, "not a valid hostname[/path]"))?;
        if url.port().is_some() {
            return Err(ConfigError::invalid_pattern(pattern, "port is not allowed"));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(ConfigError::invalid_pattern(pattern, "userinfo is not allowed"));
        }
        let hostname = url.host_str().map(normalize_hostname).unwrap_or_default();
        if hostname.is_empty() {
            return Err(ConfigError::invalid_pattern(pattern, "empty hostname"));
        }

        Ok(Self {
            hostname,
            pathname: normalize_pathname(url.path()),
        })
    }
}

impl fmt::Display for DomainPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pathname == "/" {
            write!(f, "{}", self.hostname)
        } else {
            write!(f, "{}{}", self.hostname, self.pathname)
        }
    }
}

/// Lowercase and drop the trailing dot of a fully-qualified name.
pub fn normalize_hostname(host: &str) -> String {
    host.trim_end_matches('.').to_ascii_lowercase()
}

/// `/`-prefixed path with empty segments removed and no trailing slash
/// (except the root itself). A missing leading slash is tolerated.
pub fn normalize_pathname(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}
