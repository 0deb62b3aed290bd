//! `reftrack enrich [path]` – attribute tag beacons read as JSON lines.

use anyhow::{Context, Result};
use reftrack_core::attribution::Attributor;
use reftrack_core::beacon::{self, Beacon};
use reftrack_core::config::ReftrackConfig;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Lines written and lines skipped as malformed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub written: usize,
    pub skipped: usize,
}

pub fn run_enrich(cfg: &ReftrackConfig, path: Option<&Path>) -> Result<()> {
    let attributor = cfg.build_attributor()?;
    let input: Box<dyn BufRead> = match path {
        Some(p) if p != Path::new("-") => Box::new(BufReader::new(
            File::open(p).with_context(|| format!("open beacons: {}", p.display()))?,
        )),
        _ => Box::new(io::stdin().lock()),
    };
    let stdout = io::stdout();
    let summary = enrich_lines(&attributor, input, stdout.lock())?;
    tracing::info!(
        written = summary.written,
        skipped = summary.skipped,
        "enrich finished"
    );
    if summary.skipped > 0 {
        eprintln!("skipped {} malformed beacon(s)", summary.skipped);
    }
    Ok(())
}

/// Enrich every non-blank line of `input`; malformed lines are reported on
/// stderr and skipped, I/O errors abort.
pub fn enrich_lines<R: BufRead, W: Write>(
    attributor: &Attributor,
    input: R,
    mut output: W,
) -> Result<EnrichSummary> {
    let mut summary = EnrichSummary::default();
    for (n, line) in input.lines().enumerate() {
        let line = line.context("read beacon line")?;
        if line.trim().is_empty() {
            continue;
        }
        match Beacon::from_json(&line) {
            Ok(b) => {
                let event = beacon::enrich(attributor, b);
                serde_json::to_writer(&mut output, &event)?;
                output.write_all(b"\n")?;
                summary.written += 1;
            }
            Err(e) => {
                eprintln!("line {}: {}", n + 1, e);
                summary.skipped += 1;
            }
        }
    }
    output.flush()?;
    Ok(summary)
}
