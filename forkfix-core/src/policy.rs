//! Pass selection policy: allow/deny id patterns, safety gates, and
//! required-parameter checks. A policy skip is normal operation, never an
//! error; only missing parameters degrade the run verdict.

use crate::settings::RunSettings;
use forkfix_domain::{PassContext, PassMeta};
use forkfix_types::pass::SafetyClass;

/// Why a pass is not running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    Allowlist,
    Denylist,
    GuardedGate,
    UnsafeGate,
    MissingParams(Vec<&'static str>),
}

impl Skip {
    pub fn reason(&self) -> String {
        match self {
            Skip::Allowlist => "not in allowlist".to_string(),
            Skip::Denylist => "denied by policy".to_string(),
            Skip::GuardedGate => "guarded passes require allow_guarded".to_string(),
            Skip::UnsafeGate => "unsafe passes require allow_unsafe".to_string(),
            Skip::MissingParams(keys) => format!("missing params: {}", keys.join(", ")),
        }
    }

    /// Intentional policy skips are quiet; a selected pass that cannot run
    /// for lack of parameters degrades the verdict.
    pub fn is_warning(&self) -> bool {
        matches!(self, Skip::MissingParams(_))
    }
}

/// Decide whether `meta` runs under `settings`, checked in order:
/// allowlist, denylist, safety gate, required params.
pub fn skip_for(meta: &PassMeta, settings: &RunSettings, ctx: &PassContext) -> Option<Skip> {
    if !settings.allow.is_empty() && !matches_any(&settings.allow, meta.id) {
        return Some(Skip::Allowlist);
    }
    if matches_any(&settings.deny, meta.id) {
        return Some(Skip::Denylist);
    }
    match meta.safety {
        SafetyClass::Safe => {}
        SafetyClass::Guarded => {
            if !settings.allow_guarded {
                return Some(Skip::GuardedGate);
            }
        }
        SafetyClass::Unsafe => {
            if !settings.allow_unsafe {
                return Some(Skip::UnsafeGate);
            }
        }
    }
    let missing = ctx.missing_params(meta);
    if !missing.is_empty() {
        return Some(Skip::MissingParams(missing));
    }
    None
}

fn matches_any(patterns: &[String], id: &str) -> bool {
    patterns.iter().any(|p| match glob::Pattern::new(p) {
        Ok(pattern) => pattern.matches(id),
        Err(_) => p == id,
    })
}
