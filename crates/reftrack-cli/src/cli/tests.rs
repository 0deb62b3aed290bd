use super::*;
use reftrack_core::config::ReftrackConfig;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

fn table_file(contents: &str) -> tempfile::NamedTempFile {
    let mut f = Builder::new().suffix(".toml").tempfile().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

#[test]
fn cli_parse_classify() {
    match parse(&["reftrack", "classify", "https://www.google.com/?q=x"]).command {
        CliCommand::Classify { referrer, page } => {
            assert_eq!(referrer, "https://www.google.com/?q=x");
            assert!(page.is_none());
        }
        _ => panic!("expected Classify"),
    }
}

#[test]
fn cli_parse_classify_with_page() {
    match parse(&[
        "reftrack",
        "classify",
        "https://t.co/x",
        "--page",
        "https://site.example/?utm_source=a",
    ])
    .command
    {
        CliCommand::Classify { page, .. } => {
            assert_eq!(page.as_deref(), Some("https://site.example/?utm_source=a"))
        }
        _ => panic!("expected Classify"),
    }
}

#[test]
fn cli_parse_check() {
    match parse(&["reftrack", "check"]).command {
        CliCommand::Check { sources, strict } => {
            assert!(sources.is_none());
            assert!(!strict);
        }
        _ => panic!("expected Check"),
    }
}

#[test]
fn cli_parse_check_strict_with_sources() {
    match parse(&["reftrack", "check", "--strict", "--sources", "extra.toml"]).command {
        CliCommand::Check { sources, strict } => {
            assert_eq!(sources.as_deref(), Some(Path::new("extra.toml")));
            assert!(strict);
        }
        _ => panic!("expected Check"),
    }
}

#[test]
fn cli_parse_enrich_stdin_and_file() {
    match parse(&["reftrack", "enrich"]).command {
        CliCommand::Enrich { path } => assert!(path.is_none()),
        _ => panic!("expected Enrich"),
    }
    match parse(&["reftrack", "enrich", "beacons.jsonl"]).command {
        CliCommand::Enrich { path } => {
            assert_eq!(path.as_deref(), Some(Path::new("beacons.jsonl")))
        }
        _ => panic!("expected Enrich"),
    }
}

#[test]
fn cli_parse_global_config_after_subcommand() {
    let cli = parse(&["reftrack", "check", "--config", "/tmp/reftrack.toml"]);
    assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/reftrack.toml")));
}

#[test]
fn cli_parse_rejects_missing_referrer() {
    assert!(Cli::try_parse_from(["reftrack", "classify"]).is_err());
}

#[test]
fn check_accepts_valid_extra_table() {
    let f = table_file("[partner.Acme]\ndomains = [\"acme.example\", \"acme.example/blog\"]\n");
    let cfg = ReftrackConfig::default();
    commands::run_check(&cfg, Some(f.path().to_path_buf()), true).unwrap();
}

#[test]
fn check_fails_on_invalid_pattern() {
    let f = table_file("[partner.Broken]\ndomains = [\"/no-host\"]\n");
    let cfg = ReftrackConfig::default();
    let err = commands::run_check(&cfg, Some(f.path().to_path_buf()), false).unwrap_err();
    assert!(format!("{err:#}").contains("/no-host"));
}

#[test]
fn check_strict_fails_on_duplicate() {
    // Same host as the built-in Twitter entry, under another source name.
    let f = table_file("[partner.Shortener]\ndomains = [\"t.co\"]\n");
    let cfg = ReftrackConfig::default();
    commands::run_check(&cfg, Some(f.path().to_path_buf()), false).unwrap();
    assert!(commands::run_check(&cfg, Some(f.path().to_path_buf()), true).is_err());
}
