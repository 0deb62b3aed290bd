//! Traffic attribution for a page view: UTM tags first, then the referrer.
//!
//! Order of precedence:
//! 1. `utm_source` / `utm_medium` on the page URL (explicit campaign tagging);
//! 2. no usable referrer → direct;
//! 3. referrer on the same property → internal navigation;
//! 4. referrer known to the index → referral with source/medium/term;
//! 5. anything else → unknown external referrer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::classify::Classification;
use crate::index::pattern::normalize_hostname;
use crate::index::ReferrerIndex;

/// Explicit marketing attribution read from `utm_*` query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// How a page view is attributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attribution {
    Campaign(Campaign),
    Referral(Classification),
    Unknown { href: String },
    Internal,
    Direct,
}

/// Read UTM parameters from a page URL.
///
/// Returns `None` unless `utm_source` or `utm_medium` is non-empty; a lone
/// `utm_campaign` is not enough to override referrer inference.
pub fn utm_parameters(page: &Url) -> Option<Campaign> {
    page.query()?;
    let mut campaign = Campaign::default();
    for (key, value) in page.query_pairs() {
        let slot = match &*key {
            "utm_source" => &mut campaign.source,
            "utm_medium" => &mut campaign.medium,
            "utm_campaign" => &mut campaign.campaign,
            "utm_term" => &mut campaign.term,
            "utm_content" => &mut campaign.content,
            _ => continue,
        };
        if slot.is_none() && !value.is_empty() {
            *slot = Some(value.into_owned());
        }
    }
    if campaign.source.is_some() || campaign.medium.is_some() {
        Some(campaign)
    } else {
        None
    }
}

/// Attribution entry point used by the collector.
#[derive(Debug, Clone)]
pub struct Attributor {
    index: Arc<ReferrerIndex>,
    internal_hosts: Vec<String>,
}

impl Attributor {
    pub fn new(index: Arc<ReferrerIndex>) -> Self {
        Self {
            index,
            internal_hosts: Vec::new(),
        }
    }

    /// Hosts (and their subdomains) that count as the property itself.
    pub fn with_internal_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.internal_hosts = hosts
            .into_iter()
            .map(|h| normalize_hostname(h.as_ref()))
            .filter(|h| !h.is_empty())
            .collect();
        self
    }

    pub fn index(&self) -> &ReferrerIndex {
        &self.index
    }

    /// Attribute a page view. `referrer` is the raw `document.referrer`
    /// string; an empty or unparsable value is treated as direct traffic.
    pub fn attribute(&self, page: Option<&Url>, referrer: &str) -> Attribution {
        if let Some(campaign) = page.and_then(utm_parameters) {
            return Attribution::Campaign(campaign);
        }

        let referrer = referrer.trim();
        if referrer.is_empty() {
            return Attribution::Direct;
        }
        let referrer = match Url::parse(referrer) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(referrer, error = %e, "unparsable referrer, treating as direct");
                return Attribution::Direct;
            }
        };

        if self.is_internal(page, &referrer) {
            return Attribution::Internal;
        }

        match self.index.classify(&referrer) {
            Some(classification) => Attribution::Referral(classification),
            None => Attribution::Unknown {
                href: referrer.as_str().to_string(),
            },
        }
    }

    fn is_internal(&self, page: Option<&Url>, referrer: &Url) -> bool {
        let Some(host) = referrer.host_str().map(normalize_hostname) else {
            return false;
        };
        let same_host = page
            .and_then(Url::host_str)
            .map(normalize_hostname)
            .is_some_and(|page_host| page_host == host);
        same_host
            || self.internal_hosts.iter().any(|internal| {
                host == *internal
                    || host
                        .strip_suffix(internal.as_str())
                        .is_some_and(|rest| rest.ends_with('.'))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::DuplicatePolicy;
    use crate::sources::{SourceEntry, SourceTable};

    fn attributor() -> Attributor {
        let mut t = SourceTable::new();
        t.insert(
            "search",
            "Google",
            SourceEntry {
                domains: vec!["www.google.com".into()],
                parameters: vec!["q".into()],
            },
        );
        let index = ReferrerIndex::build(&t, DuplicatePolicy::Error).unwrap();
        Attributor::new(Arc::new(index)).with_internal_hosts(["shop.example", "Blog.Example."])
    }

    fn page(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn utm_parameters_override_referrer() {
        let page = page("https://site.example/?utm_source=newsletter&utm_medium=email&utm_campaign=fall");
        let got = attributor().attribute(Some(&page), "https://www.google.com/search?q=x");
        assert_eq!(
            got,
            Attribution::Campaign(Campaign {
                source: Some("newsletter".into()),
                medium: Some("email".into()),
                campaign: Some("fall".into()),
                term: None,
                content: None,
            })
        );
    }

    #[test]
    fn campaign_alone_is_not_utm_attribution() {
        assert!(utm_parameters(&page("https://site.example/?utm_campaign=x")).is_none());
        assert!(utm_parameters(&page("https://site.example/?utm_source=")).is_none());
        assert!(utm_parameters(&page("https://site.example/")).is_none());
    }

    #[test]
    fn empty_or_malformed_referrer_is_direct() {
        let a = attributor();
        let p = page("https://site.example/");
        assert_eq!(a.attribute(Some(&p), ""), Attribution::Direct);
        assert_eq!(a.attribute(Some(&p), "   "), Attribution::Direct);
        assert_eq!(a.attribute(Some(&p), "not a url"), Attribution::Direct);
    }

    #[test]
    fn same_host_referrer_is_internal() {
        let a = attributor();
        let p = page("https://site.example/pricing");
        assert_eq!(
            a.attribute(Some(&p), "https://site.example/"),
            Attribution::Internal
        );
        assert_eq!(
            a.attribute(None, "https://www.shop.example/cart"),
            Attribution::Internal
        );
        assert_eq!(
            a.attribute(None, "https://blog.example/post"),
            Attribution::Internal
        );
        assert!(matches!(
            a.attribute(None, "https://notshop.example/"),
            Attribution::Unknown { .. }
        ));
    }

    #[test]
    fn known_referrer_is_referral() {
        let got = attributor().attribute(None, "https://www.google.com/search?q=reftrack");
        match got {
            Attribution::Referral(c) => {
                assert_eq!(c.source, "Google");
                assert_eq!(c.term.as_deref(), Some("reftrack"));
            }
            other => panic!("expected referral, got {other:?}"),
        }
    }

    #[test]
    fn unknown_referrer_keeps_href() {
        let got = attributor().attribute(None, "https://someblog.example/post");
        assert_eq!(
            got,
            Attribution::Unknown {
                href: "https://someblog.example/post".into()
            }
        );
    }

    #[test]
    fn attribution_serializes_with_kind_tag() {
        let json = serde_json::to_value(Attribution::Direct).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "direct" }));
        let got = attributor().attribute(None, "https://www.google.com/");
        let json = serde_json::to_value(got).unwrap();
        assert_eq!(json["kind"], "referral");
        assert_eq!(json["source"], "Google");
    }
}
