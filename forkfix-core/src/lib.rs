//! Embeddable core library for forkfix.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking
//! into other host processes.
//!
//! # Port traits
//!
//! Filesystem access is abstracted behind port traits in [`ports`]:
//! - [`FileDiscovery`](ports::FileDiscovery) — enumerate candidate files
//! - [`WritePort`](ports::WritePort) — write artifact files
//!
//! The [`adapters`] module provides default filesystem-backed
//! implementations.
//!
//! # Entry points
//!
//! - [`run_rewrites`](pipeline::run_rewrites) — run selected passes over a
//!   tree and produce a report + patch
//! - [`write_run_artifacts`](pipeline::write_run_artifacts) — persist
//!   `report.json` and `patch.diff`

pub mod adapters;
pub mod pipeline;
pub mod policy;
pub mod ports;
pub mod settings;

// Re-export the domain surface so embedders don't need forkfix-domain directly.
pub use forkfix_domain::{PassContext, PassMeta, RewritePass, builtin_pass_metas, builtin_passes};
