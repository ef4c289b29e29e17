//! Shared DTOs (schemas-as-code) for the forkfix workspace.
//!
//! # Design constraints
//! - These types are intended to be serialized to disk.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod fix;
pub mod pass;
pub mod report;

/// Schema identifiers.
pub mod schema {
    pub const FORKFIX_REPORT_V1: &str = "forkfix.report.v1";
}
