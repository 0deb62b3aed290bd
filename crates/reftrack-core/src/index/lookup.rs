//! Most-specific-first lookups over the two index levels.

use super::pattern::normalize_pathname;
use super::{HostnameIndex, PathnameIndex, SourceDescriptor};

/// Find the path index for `hostname` or its closest registered parent.
///
/// Tries the full hostname, then strips one leading label at a time
/// (`sub.example.co.uk` → `example.co.uk` → `co.uk` → `uk`). An exact
/// registration therefore always beats a parent-domain registration.
pub fn find_pathname_index<'a>(
    index: &'a HostnameIndex,
    hostname: &str,
) -> Option<&'a PathnameIndex> {
    let mut suffix = hostname;
    loop {
        if let Some(paths) = index.get(suffix) {
            return Some(paths);
        }
        let (_, parent) = suffix.split_once('.')?;
        suffix = parent;
    }
}

/// Find the descriptor registered at the longest prefix of `pathname`.
///
/// `/a/b/c` tries `/a/b/c`, `/a/b`, `/a`, then `/`. A registration at `/` is
/// the fallback for every path under the host.
pub fn find_referer_by_pathname<'a>(
    index: &'a PathnameIndex,
    pathname: &str,
) -> Option<&'a SourceDescriptor> {
    let normalized = normalize_pathname(pathname);
    let mut prefix = normalized.as_str();
    loop {
        if let Some(descriptor) = index.get(prefix) {
            return Some(descriptor);
        }
        prefix = match prefix.rfind('/') {
            Some(0) if prefix.len() > 1 => "/",
            Some(pos) if pos > 0 => &prefix[..pos],
            _ => return None,
        };
    }
}
