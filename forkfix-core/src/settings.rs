//! Clap-free settings for the rewrite pipeline.

use camino::Utf8PathBuf;
use std::collections::HashMap;

/// Settings for one rewrite run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub root: Utf8PathBuf,
    pub out_dir: Utf8PathBuf,

    // Pass selection policy
    pub allow: Vec<String>,
    pub deny: Vec<String>,
    pub allow_guarded: bool,
    pub allow_unsafe: bool,
    pub max_files: Option<u64>,

    // Behaviour
    pub dry_run: bool,
    pub backup: BackupSettings,

    // Pass parameters (vendor names, needles)
    pub params: HashMap<String, String>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            out_dir: Utf8PathBuf::from(".forkfix"),
            allow: Vec::new(),
            deny: Vec::new(),
            allow_guarded: false,
            allow_unsafe: false,
            max_files: None,
            dry_run: false,
            backup: BackupSettings::default(),
            params: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackupSettings {
    pub enabled: bool,
    pub suffix: String,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            suffix: ".forkfix.bak".to_string(),
        }
    }
}
