//! `reftrack check` – build the index from the configured tables and report.

use anyhow::Result;
use reftrack_core::config::ReftrackConfig;
use reftrack_core::{DuplicatePolicy, ReferrerIndex};
use std::path::PathBuf;

pub fn run_check(cfg: &ReftrackConfig, sources: Option<PathBuf>, strict: bool) -> Result<()> {
    let mut cfg = cfg.clone();
    if sources.is_some() {
        cfg.sources_path = sources;
    }
    if strict {
        cfg.duplicate_policy = DuplicatePolicy::Error;
    }

    let table = cfg.source_table()?;
    let index = ReferrerIndex::build(&table, cfg.duplicate_policy)?;
    let stats = index.stats();

    println!("mediums:    {}", stats.mediums);
    println!("sources:    {}", stats.sources);
    println!("hostnames:  {}", stats.hostnames);
    println!("patterns:   {}", stats.patterns);
    println!("duplicates: {}", stats.duplicates);
    for medium in table.mediums() {
        let count = table.entries().filter(|(m, _, _)| *m == medium).count();
        println!("  {medium}: {count} sources");
    }
    Ok(())
}
