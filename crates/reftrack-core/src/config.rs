use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::attribution::Attributor;
use crate::index::{DuplicatePolicy, ReferrerIndex};
use crate::sources::SourceTable;

fn default_true() -> bool {
    true
}

/// Global configuration loaded from `~/.config/reftrack/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReftrackConfig {
    /// Start from the source table embedded in the binary.
    #[serde(default = "default_true")]
    pub builtin_sources: bool,
    /// Optional extra source table (.json or .toml) merged over the built-in one.
    #[serde(default)]
    pub sources_path: Option<PathBuf>,
    /// Handling of duplicate (hostname, path) registrations: "warn", "error" or "ignore".
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
    /// Hosts of the tracked property; referrers from these (or subdomains) are internal.
    #[serde(default)]
    pub internal_hosts: Vec<String>,
}

impl Default for ReftrackConfig {
    fn default() -> Self {
        Self {
            builtin_sources: true,
            sources_path: None,
            duplicate_policy: DuplicatePolicy::Warn,
            internal_hosts: Vec::new(),
        }
    }
}

impl ReftrackConfig {
    /// Assemble the source table this config describes.
    pub fn source_table(&self) -> Result<SourceTable> {
        let mut table = if self.builtin_sources {
            SourceTable::builtin().context("load built-in source table")?
        } else {
            SourceTable::new()
        };
        if let Some(path) = &self.sources_path {
            let extra = SourceTable::from_path(path)?;
            table.merge(extra);
        }
        if table.is_empty() {
            anyhow::bail!("no referrer sources configured (builtin_sources = false and no sources_path)");
        }
        Ok(table)
    }

    pub fn build_index(&self) -> Result<ReferrerIndex> {
        let table = self.source_table()?;
        let index = ReferrerIndex::build(&table, self.duplicate_policy)?;
        let stats = index.stats();
        tracing::info!(
            hostnames = stats.hostnames,
            sources = stats.sources,
            duplicates = stats.duplicates,
            "referrer index ready"
        );
        Ok(index)
    }

    pub fn build_attributor(&self) -> Result<Attributor> {
        let index = self.build_index()?;
        Ok(Attributor::new(Arc::new(index)).with_internal_hosts(&self.internal_hosts))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("reftrack")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ReftrackConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ReftrackConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit path; the file must exist.
pub fn load_from_path(path: &Path) -> Result<ReftrackConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ReftrackConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn default_config_values() {
        let cfg = ReftrackConfig::default();
        assert!(cfg.builtin_sources);
        assert!(cfg.sources_path.is_none());
        assert_eq!(cfg.duplicate_policy, DuplicatePolicy::Warn);
        assert!(cfg.internal_hosts.is_empty());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ReftrackConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ReftrackConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.builtin_sources, cfg.builtin_sources);
        assert_eq!(parsed.duplicate_policy, cfg.duplicate_policy);
        assert_eq!(parsed.internal_hosts, cfg.internal_hosts);
    }

    #[test]
    fn config_toml_empty_uses_defaults() {
        let cfg: ReftrackConfig = toml::from_str("").unwrap();
        assert!(cfg.builtin_sources);
        assert_eq!(cfg.duplicate_policy, DuplicatePolicy::Warn);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            builtin_sources = false
            sources_path = "/etc/reftrack/sources.toml"
            duplicate_policy = "error"
            internal_hosts = ["example.com", "shop.example.com"]
        "#;
        let cfg: ReftrackConfig = toml::from_str(toml).unwrap();
        assert!(!cfg.builtin_sources);
        assert_eq!(
            cfg.sources_path.as_deref(),
            Some(Path::new("/etc/reftrack/sources.toml"))
        );
        assert_eq!(cfg.duplicate_policy, DuplicatePolicy::Error);
        assert_eq!(cfg.internal_hosts.len(), 2);
    }

    #[test]
    fn config_rejects_unknown_policy() {
        assert!(toml::from_str::<ReftrackConfig>("duplicate_policy = \"maybe\"").is_err());
    }

    #[test]
    fn load_from_path_reads_file() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"internal_hosts = [\"example.com\"]\n").unwrap();
        f.flush().unwrap();
        let cfg = load_from_path(f.path()).unwrap();
        assert_eq!(cfg.internal_hosts, vec!["example.com"]);
    }

    #[test]
    fn extra_sources_are_merged_over_builtin() {
        let mut sources = Builder::new().suffix(".toml").tempfile().unwrap();
        sources
            .write_all(b"[partner.Acme]\ndomains = [\"acme.example\"]\n")
            .unwrap();
        sources.flush().unwrap();

        let cfg = ReftrackConfig {
            sources_path: Some(sources.path().to_path_buf()),
            ..ReftrackConfig::default()
        };
        let table = cfg.source_table().unwrap();
        assert!(table.mediums().any(|m| m == "partner"));
        assert!(table.mediums().any(|m| m == "search"));

        let attributor = cfg.build_attributor().unwrap();
        let url = url::Url::parse("https://www.acme.example/x").unwrap();
        assert_eq!(attributor.index().classify(&url).unwrap().source, "Acme");
    }

    #[test]
    fn empty_table_is_an_error() {
        let cfg = ReftrackConfig {
            builtin_sources: false,
            ..ReftrackConfig::default()
        };
        assert!(cfg.source_table().is_err());
    }
}
