//! Minimal structural line model for GN build-configuration files.
//!
//! This is deliberately not a grammar: forkfix only needs to tell apart the
//! handful of line shapes its repair passes key on (comments, block
//! keywords, `name = [` openers, `]` closers, incomplete assignments, and
//! bare values), and to guess the shape of an orphaned value token. Both
//! are heuristics over single lines; neither validates GN.

pub mod line;
pub mod value;

pub use line::{Assignment, LineKind, classify, is_bare_value};
pub use value::{ValueShape, classify_value};
