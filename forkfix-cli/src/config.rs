//! Configuration file loading for forkfix.
//!
//! Discovers and loads `forkfix.toml` from the tree root and merges it
//! with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "forkfix.toml";

/// Top-level configuration from forkfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ForkfixConfig {
    /// Pass selection policy.
    pub policy: PolicyConfig,

    /// Backup settings.
    pub backups: BackupsConfig,

    /// Pass parameters (vendor names, needles).
    pub params: HashMap<String, String>,
}

/// Policy section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Allowlist patterns for pass ids.
    /// If non-empty, only allowlisted passes are eligible.
    pub allow: Vec<String>,

    /// Denylist patterns for pass ids.
    pub deny: Vec<String>,

    /// Allow guarded passes to run.
    pub allow_guarded: bool,

    /// Allow unsafe passes to run.
    pub allow_unsafe: bool,

    /// Skip a pass whose file set exceeds this many files.
    pub max_files: Option<u64>,
}

/// Backups section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackupsConfig {
    /// Whether to create backups before rewriting files.
    pub enabled: bool,

    /// Suffix for backup files.
    pub suffix: String,
}

impl Default for BackupsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            suffix: ".forkfix.bak".to_string(),
        }
    }
}

/// Discover the forkfix.toml config file in the tree root.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a forkfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<ForkfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<ForkfixConfig> {
    let config: ForkfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the tree root, or return defaults if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<ForkfixConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(ForkfixConfig::default()),
    }
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
    pub allow_guarded: bool,
    pub allow_unsafe: bool,
    pub max_files: Option<u64>,
    pub backup_enabled: bool,
    pub backup_suffix: String,
    pub params: HashMap<String, String>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: ForkfixConfig,
}

impl ConfigMerger {
    pub fn new(config: ForkfixConfig) -> Self {
        Self { config }
    }

    /// Merge with run command CLI arguments.
    ///
    /// CLI `allow`/`deny` lists extend the config file lists; boolean flags
    /// enable on top of the config; `max_files` from the CLI overrides.
    #[allow(clippy::too_many_arguments)]
    pub fn merge_run_args(
        self,
        cli_allow: &[String],
        cli_deny: &[String],
        cli_allow_guarded: bool,
        cli_allow_unsafe: bool,
        cli_backup: bool,
        cli_max_files: Option<u64>,
        cli_params: &HashMap<String, String>,
    ) -> MergedConfig {
        let mut allow = self.config.policy.allow.clone();
        let mut deny = self.config.policy.deny.clone();

        for pattern in cli_allow {
            if !allow.contains(pattern) {
                allow.push(pattern.clone());
            }
        }
        for pattern in cli_deny {
            if !deny.contains(pattern) {
                deny.push(pattern.clone());
            }
        }

        let mut params = self.config.params.clone();
        for (k, v) in cli_params {
            params.insert(k.clone(), v.clone());
        }

        MergedConfig {
            allow,
            deny,
            allow_guarded: cli_allow_guarded || self.config.policy.allow_guarded,
            allow_unsafe: cli_allow_unsafe || self.config.policy.allow_unsafe,
            max_files: cli_max_files.or(self.config.policy.max_files),
            backup_enabled: cli_backup || self.config.backups.enabled,
            backup_suffix: self.config.backups.suffix.clone(),
            params,
        }
    }
}

/// Parse CLI params from key=value strings.
pub fn parse_cli_params(params: &[String]) -> anyhow::Result<HashMap<String, String>> {
    let mut out = HashMap::new();
    for entry in params {
        let mut parts = entry.splitn(2, '=');
        let key = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("invalid param '{}': missing key", entry))?;
        let value = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("invalid param '{}': missing value", entry))?;
        out.insert(key.to_string(), value.to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_example_config() {
        let contents = r#"
[policy]
allow = ["gn.*"]
deny = ["tree.rename_vendor_all"]
allow_guarded = true
allow_unsafe = false
max_files = 500

[backups]
enabled = true
suffix = ".forkfix.bak"

[params]
vendor_old = "acme"
vendor_new = "zenith"
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(config.policy.allow, vec!["gn.*"]);
        assert!(config.policy.allow_guarded);
        assert!(!config.policy.allow_unsafe);
        assert_eq!(config.policy.max_files, Some(500));
        assert!(config.backups.enabled);
        assert_eq!(config.params.get("vendor_old"), Some(&"acme".to_string()));
    }

    #[test]
    fn parse_empty_config_gives_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.policy.allow.is_empty());
        assert!(!config.backups.enabled);
        assert_eq!(config.backups.suffix, ".forkfix.bak");
    }

    #[test]
    fn merge_cli_extends_lists() {
        let config = ForkfixConfig {
            policy: PolicyConfig {
                allow: vec!["gn.*".to_string()],
                deny: vec!["tree.*".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = ConfigMerger::new(config).merge_run_args(
            &["gn.seed_empty_arrays".to_string()],
            &["gn.comment_component_deps".to_string()],
            false,
            false,
            false,
            None,
            &HashMap::new(),
        );

        assert_eq!(merged.allow.len(), 2);
        assert_eq!(merged.deny.len(), 2);
    }

    #[test]
    fn merge_cli_booleans_enable_on_top_of_config() {
        let config = ForkfixConfig {
            policy: PolicyConfig {
                allow_guarded: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = ConfigMerger::new(config).merge_run_args(
            &[],
            &[],
            false,
            true,
            false,
            None,
            &HashMap::new(),
        );
        assert!(merged.allow_guarded);
        assert!(merged.allow_unsafe);
    }

    #[test]
    fn merge_cli_max_files_overrides_config() {
        let config = ForkfixConfig {
            policy: PolicyConfig {
                max_files: Some(10),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = ConfigMerger::new(config.clone()).merge_run_args(
            &[],
            &[],
            false,
            false,
            false,
            Some(99),
            &HashMap::new(),
        );
        assert_eq!(merged.max_files, Some(99));

        let merged = ConfigMerger::new(config).merge_run_args(
            &[],
            &[],
            false,
            false,
            false,
            None,
            &HashMap::new(),
        );
        assert_eq!(merged.max_files, Some(10));
    }

    #[test]
    fn merge_cli_params_override_config() {
        let mut config = ForkfixConfig::default();
        config
            .params
            .insert("vendor_old".to_string(), "acme".to_string());

        let mut cli = HashMap::new();
        cli.insert("vendor_old".to_string(), "globex".to_string());

        let merged =
            ConfigMerger::new(config).merge_run_args(&[], &[], false, false, false, None, &cli);
        assert_eq!(merged.params.get("vendor_old"), Some(&"globex".to_string()));
    }

    #[test]
    fn parse_cli_params_valid_and_invalid() {
        let parsed =
            parse_cli_params(&["vendor_old=acme".to_string(), "vendor_new=zenith".to_string()])
                .expect("parse");
        assert_eq!(parsed.get("vendor_old"), Some(&"acme".to_string()));

        let err = parse_cli_params(&["=value".to_string()]).expect_err("missing key");
        assert!(err.to_string().contains("missing key"));

        let err = parse_cli_params(&["key=".to_string()]).expect_err("missing value");
        assert!(err.to_string().contains("missing value"));
    }

    #[test]
    fn discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert!(discover_config(&root).is_some());
    }

    #[test]
    fn load_or_default_returns_default_when_missing() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let cfg = load_or_default(&root).expect("load default");
        assert!(cfg.policy.allow.is_empty());
        assert!(!cfg.backups.enabled);
    }
}
