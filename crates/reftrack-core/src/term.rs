//! Search term extraction from a referrer's query string.

use url::Url;

use crate::index::SourceDescriptor;

/// Return the first non-empty value among the descriptor's search parameters.
///
/// Parameters are tried in declared order. For each name only its first
/// occurrence in the query counts; if that value is empty the next parameter
/// name is tried. Values are percent- and `+`-decoded.
pub fn extract_term(descriptor: &SourceDescriptor, referrer: &Url) -> Option<String> {
    if descriptor.search_parameters.is_empty() || referrer.query().is_none() {
        return None;
    }
    let pairs: Vec<_> = referrer.query_pairs().collect();
    descriptor.search_parameters.iter().find_map(|param| {
        pairs
            .iter()
            .find(|(key, _)| *key == param.as_str())
            .map(|(_, value)| value)
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string())
    })
}
