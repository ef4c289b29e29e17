use serde::{Deserialize, Serialize};

/// What a single applied fix did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixKind {
    /// Empty array + dangling value collapsed into one assignment.
    EmptyArrayValue,
    /// Marker comment + empty array + dangling value collapsed into one assignment.
    MarkedEmptyArrayValue,
    /// Bare `name =` completed with the value found on the following line.
    TrailingValue,
    /// Bare `name =` rewritten to a marker comment plus an empty array.
    SeededEmptyArray,
    /// A dependency line commented out.
    CommentedDependency,
    /// A vendor import line commented out.
    GuardedImport,
    /// Textual vendor substitution on one line.
    Replacement,
}

/// One fix applied by a pass, addressed by its 1-based input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedFix {
    pub line: u64,
    pub kind: FixKind,

    /// The repaired variable name, replaced needle, or other subject of the fix.
    pub subject: String,
}

impl AppliedFix {
    pub fn new(line: usize, kind: FixKind, subject: impl Into<String>) -> Self {
        Self {
            line: line as u64,
            kind,
            subject: subject.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_kind_snake_case() {
        let json = serde_json::to_string(&FixKind::MarkedEmptyArrayValue).unwrap();
        assert_eq!(json, "\"marked_empty_array_value\"");
    }

    #[test]
    fn applied_fix_roundtrip() {
        let fix = AppliedFix::new(7, FixKind::TrailingValue, "sources");
        let json = serde_json::to_string(&fix).unwrap();
        let back: AppliedFix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fix);
    }
}
