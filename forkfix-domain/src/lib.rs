//! Domain logic: the rewrite passes applied to a fork's source tree.
//!
//! This crate owns *what* gets rewritten and why. It never touches the
//! filesystem; passes transform an in-memory line sequence and report the
//! fixes they applied. Reading, writing, and batching live in
//! `forkfix-edit` and `forkfix-core`.

mod passes;

pub use passes::{
    EMPTY_ARRAY_MARKER_PREFIX, PassContext, PassMeta, Rewrite, RewritePass, builtin_pass_metas,
    builtin_passes, find_pass, params,
};
