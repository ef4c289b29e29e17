//! File engine for forkfix.
//!
//! Responsibilities:
//! - Read files permissively (lossy UTF-8) into a line sequence.
//! - Rewrite modified files atomically (temp file + rename), optionally
//!   taking a `.bak` copy of the original first.
//! - Render unified diff previews and content hashes for the run report.
//!
//! Unmodified files are never written, so their on-disk bytes stay
//! untouched no matter how they decode.

mod error;

pub use error::{EditError, EditResult};

use camino::Utf8Path;
use diffy::PatchFormatter;
use fs_err as fs;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::debug;

/// One file's text, decoded permissively and split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub lines: Vec<String>,
    pub had_trailing_newline: bool,
}

impl SourceText {
    pub fn from_str(text: &str) -> Self {
        let (lines, had_trailing_newline) = split_lines(text);
        Self {
            lines,
            had_trailing_newline,
        }
    }

    /// Reassemble file content from a (possibly rewritten) line sequence,
    /// preserving the original trailing-newline state.
    pub fn render(&self, lines: &[String]) -> String {
        join_lines(lines, self.had_trailing_newline)
    }

    pub fn content(&self) -> String {
        self.render(&self.lines)
    }
}

/// Read a file into lines. Invalid UTF-8 is decoded lossily; a read
/// failure is surfaced for the caller to record and skip.
pub fn read_source(path: &Utf8Path) -> EditResult<SourceText> {
    let bytes = fs::read(path).map_err(|e| EditError::Read {
        path: path.to_owned(),
        source: e,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(SourceText::from_str(&text))
}

/// Whether the bytes look like a binary file (NUL byte in the head).
pub fn looks_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(8192).any(|b| *b == 0)
}

/// Probe a file for binary content; unreadable files are not binary
/// (the subsequent read surfaces the real error).
pub fn is_binary_file(path: &Utf8Path) -> bool {
    match fs::read(path) {
        Ok(bytes) => looks_binary(&bytes),
        Err(_) => false,
    }
}

/// Write new content over `path` via a sibling temp file and an atomic
/// rename, so a failed write never leaves a half-rewritten file behind.
pub fn write_atomic(path: &Utf8Path, content: &str) -> EditResult<()> {
    let parent = path.parent().unwrap_or(Utf8Path::new("."));
    let write_err = |e: std::io::Error| EditError::Write {
        path: path.to_owned(),
        source: e,
    };

    let mut tmp = NamedTempFile::new_in(parent.as_std_path()).map_err(write_err)?;
    std::io::Write::write_all(&mut tmp, content.as_bytes()).map_err(write_err)?;
    tmp.persist(path.as_std_path())
        .map_err(|e| write_err(e.error))?;
    debug!(file = %path, bytes = content.len(), "rewrote file");
    Ok(())
}

/// Copy the original to `<path><suffix>` before its first rewrite.
pub fn backup(path: &Utf8Path, suffix: &str) -> EditResult<camino::Utf8PathBuf> {
    let backup_path = camino::Utf8PathBuf::from(format!("{path}{suffix}"));
    fs::copy(path, &backup_path).map_err(|e| EditError::Write {
        path: backup_path.clone(),
        source: e,
    })?;
    debug!(file = %path, backup = %backup_path, "created backup");
    Ok(backup_path)
}

/// Unified diff of one file's before/after content, git-style headers
/// included; empty when nothing changed.
pub fn render_file_patch(path: &Utf8Path, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }
    let mut out = String::new();
    out.push_str(&format!("diff --git a/{path} b/{path}\n"));
    out.push_str(&format!("--- a/{path}\n+++ b/{path}\n"));
    let patch = diffy::create_patch(before, after);
    let formatter = PatchFormatter::new();
    out.push_str(&formatter.fmt_patch(&patch).to_string());
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Split text into lines without terminators, remembering whether the
/// text ended with a newline. A trailing `\r` is stripped from each line.
pub fn split_lines(text: &str) -> (Vec<String>, bool) {
    if text.is_empty() {
        return (Vec::new(), false);
    }
    let had_trailing_newline = text.ends_with('\n');
    let mut lines: Vec<String> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect();
    if had_trailing_newline {
        lines.pop();
    }
    (lines, had_trailing_newline)
}

/// Inverse of `split_lines`.
pub fn join_lines(lines: &[String], trailing_newline: bool) -> String {
    let mut out = lines.join("\n");
    if trailing_newline && !lines.is_empty() {
        out.push('\n');
    }
    out
}
