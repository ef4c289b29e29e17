//! Default filesystem-backed port implementations.

use crate::ports::{FileDiscovery, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::collections::BTreeSet;
use tracing::debug;

/// Directory names never descended into: build outputs and package caches.
/// Dot-directories (including the artifact dir) are skipped as well.
/// `build/` is real GN configuration and is deliberately not skipped.
const SKIP_DIRS: &[&str] = &["node_modules", "out", "__pycache__"];

/// Glob-based file discovery rooted at the tree under repair.
#[derive(Debug, Clone, Default)]
pub struct GlobDiscovery;

impl FileDiscovery for GlobDiscovery {
    fn discover(&self, root: &Utf8Path, globs: &[&str]) -> anyhow::Result<Vec<Utf8PathBuf>> {
        let mut found: BTreeSet<Utf8PathBuf> = BTreeSet::new();

        for pattern in globs {
            let full = root.join(pattern);
            let entries =
                glob::glob(full.as_str()).with_context(|| format!("bad glob {full}"))?;
            for entry in entries {
                let path = match entry {
                    Ok(p) => p,
                    Err(e) => {
                        debug!("skipping unreadable entry: {e}");
                        continue;
                    }
                };
                if !path.is_file() {
                    continue;
                }
                let utf8 = match Utf8PathBuf::from_path_buf(path) {
                    Ok(p) => p,
                    Err(p) => {
                        debug!("skipping non-utf8 path {}", p.display());
                        continue;
                    }
                };
                let rel = match utf8.strip_prefix(root) {
                    Ok(r) => r.to_path_buf(),
                    Err(_) => utf8.clone(),
                };
                if skip(&rel) {
                    continue;
                }
                found.insert(rel);
            }
        }

        Ok(found.into_iter().collect())
    }
}

fn skip(rel: &Utf8Path) -> bool {
    let mut components = rel.components().peekable();
    while let Some(component) = components.next() {
        let name = component.as_str();
        // Only directory components gate traversal; the file name itself
        // already passed the glob.
        if components.peek().is_none() {
            break;
        }
        if SKIP_DIRS.contains(&name) || name.starts_with('.') {
            return true;
        }
    }
    false
}

/// Filesystem artifact writer.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {path}"))?;
        }
        fs::write(path, contents).with_context(|| format!("write {path}"))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {path}"))
    }
}
