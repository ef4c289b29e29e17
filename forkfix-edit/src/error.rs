//! Error types for the file engine.
//!
//! The two variants map onto the batch contract: a read failure skips the
//! file before any transformation, a write failure loses the in-memory
//! transformation but leaves the on-disk content untouched. Neither aborts
//! the surrounding batch.

use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EditError {
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            EditError::Read { path, .. } => path,
            EditError::Write { path, .. } => path,
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self, EditError::Read { .. })
    }
}

pub type EditResult<T> = Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn io(kind: std::io::ErrorKind) -> std::io::Error {
        std::io::Error::new(kind, "boom")
    }

    #[test]
    fn read_error_display_names_the_path() {
        let err = EditError::Read {
            path: Utf8PathBuf::from("a/BUILD.gn"),
            source: io(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.is_read());
        assert!(err.to_string().contains("read a/BUILD.gn"));
    }

    #[test]
    fn write_error_is_not_a_read_error() {
        let err = EditError::Write {
            path: Utf8PathBuf::from("a/BUILD.gn"),
            source: io(std::io::ErrorKind::Other),
        };
        assert!(!err.is_read());
        assert_eq!(err.path().as_str(), "a/BUILD.gn");
    }
}
