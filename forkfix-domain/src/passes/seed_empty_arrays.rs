//! Rewrites bare `name =` assignments whose values were commented out into
//! an empty array, keeping the original values as comments inside the
//! brackets and leaving the marker comment the repair pass keys on.

use crate::passes::{
    EMPTY_ARRAY_MARKER_PREFIX, GN_GLOBS, PassContext, PassMeta, Rewrite, RewritePass, capitalize,
    params,
};
use anyhow::Result;
use camino::Utf8Path;
use forkfix_gn::{LineKind, classify};
use forkfix_types::fix::{AppliedFix, FixKind};
use forkfix_types::pass::SafetyClass;
use tracing::debug;

pub(crate) const META: PassMeta = PassMeta {
    id: "gn.seed_empty_arrays",
    title: "Seed empty arrays for incomplete assignments",
    safety: SafetyClass::Safe,
    description: "Replaces bare `name =` assignments (typically left behind when \
                  their values were commented out) with a marker comment and an \
                  empty array carrying the commented-out values.",
    default_globs: GN_GLOBS,
    required_params: &[],
};

pub struct SeedEmptyArrays;

impl RewritePass for SeedEmptyArrays {
    fn meta(&self) -> &'static PassMeta {
        &META
    }

    fn rewrite(
        &self,
        ctx: &PassContext,
        path: &Utf8Path,
        lines: &[String],
    ) -> Result<Rewrite> {
        let vendor = capitalize(ctx.param(params::VENDOR_OLD).unwrap_or("vendor"));

        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut fixes: Vec<AppliedFix> = Vec::new();

        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];

            if let LineKind::Incomplete(a) = classify(line) {
                let indent = a.indent;
                let name = a.name;

                // Collect the comment block that used to hold the values.
                let mut j = i + 1;
                while j < lines.len() && lines[j].trim().starts_with('#') {
                    j += 1;
                }

                out.push(format!(
                    "{indent}{EMPTY_ARRAY_MARKER_PREFIX} {vendor} components have been removed"
                ));
                out.push(format!("{indent}{name} = ["));
                for comment in &lines[i + 1..j] {
                    let content = comment.trim();
                    if content.starts_with("# [") && content.ends_with(']') {
                        // A whole commented-out array: keep only its contents.
                        let inner = content["# [".len()..content.len() - 1].trim();
                        if !inner.is_empty() {
                            out.push(format!("{indent}  # {inner}"));
                        }
                    } else {
                        out.push(format!("{indent}  {content}"));
                    }
                }
                out.push(format!("{indent}]"));

                fixes.push(AppliedFix::new(i + 1, FixKind::SeededEmptyArray, name));
                debug!(file = %path, variable = name, "seeded empty array");
                i = j;
                continue;
            }

            out.push(line.clone());
            i += 1;
        }

        Ok(Rewrite { lines: out, fixes })
    }
}
