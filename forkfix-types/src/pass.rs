use serde::{Deserialize, Serialize};

/// Stable identifier of a rewrite pass, e.g. `gn.repair_malformed_assignments`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassId(pub String);

impl PassId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PassId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Safety class for a rewrite pass.
///
/// In forkfix terms:
/// - safe: narrow line patterns, repairs shapes only an earlier pass leaves behind
/// - guarded: deterministic but comments out or rewrites live build configuration
/// - unsafe: broad textual substitution with known misfire modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyClass {
    Safe,
    Guarded,
    Unsafe,
}

impl SafetyClass {
    pub fn is_safe(self) -> bool {
        matches!(self, SafetyClass::Safe)
    }
    pub fn is_guarded(self) -> bool {
        matches!(self, SafetyClass::Guarded)
    }
    pub fn is_unsafe(self) -> bool {
        matches!(self, SafetyClass::Unsafe)
    }
}
