//! Port traits abstracting filesystem access away from the pipeline.

use camino::{Utf8Path, Utf8PathBuf};

/// Enumerate candidate files under a root for a set of glob patterns.
///
/// Implementations return root-relative paths, sorted and deduplicated, so
/// runs are deterministic.
pub trait FileDiscovery {
    fn discover(&self, root: &Utf8Path, globs: &[&str]) -> anyhow::Result<Vec<Utf8PathBuf>>;
}

/// Artifact write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
