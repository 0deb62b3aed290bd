//! Beacons sent by the collection tag, and their enriched form.
//!
//! The tag posts compact JSON, one object per beacon:
//! - page view: `{"p": property, "t": "pageview", "r": referrer, "u": url}`
//! - Web Vitals: `{"p": property, "t": "LCP", "u": url, "v": value, "i": metric id}`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::attribution::{Attribution, Attributor};

#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("malformed beacon: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown beacon type \"{0}\"")]
    UnknownType(String),
    #[error("{kind} beacon is missing field \"{field}\"")]
    MissingField { kind: String, field: &'static str },
}

/// Web Vitals metric names reported by the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricName {
    Cls,
    Fcp,
    Fid,
    Lcp,
    Ttfb,
}

impl MetricName {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricName::Cls => "CLS",
            MetricName::Fcp => "FCP",
            MetricName::Fid => "FID",
            MetricName::Lcp => "LCP",
            MetricName::Ttfb => "TTFB",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricName {
    type Err = BeaconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLS" => Ok(MetricName::Cls),
            "FCP" => Ok(MetricName::Fcp),
            "FID" => Ok(MetricName::Fid),
            "LCP" => Ok(MetricName::Lcp),
            "TTFB" => Ok(MetricName::Ttfb),
            other => Err(BeaconError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub property: String,
    pub url: String,
    pub referrer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub property: String,
    pub url: String,
    pub name: MetricName,
    pub value: f64,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Beacon {
    PageView(PageView),
    Metric(Metric),
}

/// Wire shape; field meaning depends on `t`.
#[derive(Debug, Deserialize)]
struct RawBeacon {
    p: String,
    t: String,
    u: String,
    #[serde(default)]
    r: Option<String>,
    #[serde(default)]
    v: Option<f64>,
    #[serde(default)]
    i: Option<String>,
}

impl Beacon {
    pub fn from_json(text: &str) -> Result<Self, BeaconError> {
        let raw: RawBeacon = serde_json::from_str(text)?;
        if raw.t == "pageview" {
            return Ok(Beacon::PageView(PageView {
                property: raw.p,
                url: raw.u,
                referrer: raw.r.unwrap_or_default(),
            }));
        }
        let name: MetricName = raw.t.parse()?;
        let missing = |field| BeaconError::MissingField {
            kind: name.to_string(),
            field,
        };
        let value = raw.v.ok_or_else(|| missing("v"))?;
        let id = raw.i.ok_or_else(|| missing("i"))?;
        Ok(Beacon::Metric(Metric {
            property: raw.p,
            url: raw.u,
            name,
            value,
            id,
        }))
    }

    pub fn property(&self) -> &str {
        match self {
            Beacon::PageView(v) => &v.property,
            Beacon::Metric(m) => &m.property,
        }
    }
}

/// A beacon ready for the event store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnrichedEvent {
    PageView {
        property: String,
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        referrer: Option<String>,
        attribution: Attribution,
    },
    Metric {
        property: String,
        url: String,
        name: MetricName,
        value: f64,
        id: String,
    },
}

/// Attach attribution to page views; metrics pass through.
pub fn enrich(attributor: &Attributor, beacon: Beacon) -> EnrichedEvent {
    match beacon {
        Beacon::PageView(view) => {
            let page = match Url::parse(&view.url) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::debug!(url = %view.url, error = %e, "unparsable page url");
                    None
                }
            };
            let attribution = attributor.attribute(page.as_ref(), &view.referrer);
            EnrichedEvent::PageView {
                property: view.property,
                url: view.url,
                referrer: Some(view.referrer).filter(|r| !r.is_empty()),
                attribution,
            }
        }
        Beacon::Metric(m) => EnrichedEvent::Metric {
            property: m.property,
            url: m.url,
            name: m.name,
            value: m.value,
            id: m.id,
        },
    }
}
