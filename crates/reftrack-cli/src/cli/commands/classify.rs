//! `reftrack classify <referrer> [--page <url>]`.

use anyhow::{Context, Result};
use reftrack_core::config::ReftrackConfig;
use url::Url;

pub fn run_classify(cfg: &ReftrackConfig, referrer: &str, page: Option<&str>) -> Result<()> {
    let attributor = cfg.build_attributor()?;
    let page = page
        .map(|p| Url::parse(p).with_context(|| format!("invalid page url: {p}")))
        .transpose()?;

    let attribution = attributor.attribute(page.as_ref(), referrer);
    println!("{}", serde_json::to_string_pretty(&attribution)?);
    Ok(())
}
