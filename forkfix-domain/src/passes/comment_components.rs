//! Comments out dependency lines matching a needle (default
//! `/components/`) so the build falls back to platform defaults.

use crate::passes::{GN_GLOBS, PassContext, PassMeta, Rewrite, RewritePass, params};
use anyhow::Result;
use camino::Utf8Path;
use forkfix_types::fix::{AppliedFix, FixKind};
use forkfix_types::pass::SafetyClass;
use tracing::debug;

pub(crate) const META: PassMeta = PassMeta {
    id: "gn.comment_component_deps",
    title: "Comment out component dependency lines",
    safety: SafetyClass::Guarded,
    description: "Comments out uncommented lines containing the component needle \
                  (default `/components/`), leaving a marker comment above each.",
    default_globs: GN_GLOBS,
    required_params: &[],
};

const DEFAULT_NEEDLE: &str = "/components/";

/// Marker placed above each commented-out line.
const MARKER: &str = "# Commented out: removed component dependency - using platform defaults instead";

pub struct CommentComponentDeps;

impl RewritePass for CommentComponentDeps {
    fn meta(&self) -> &'static PassMeta {
        &META
    }

    fn rewrite(
        &self,
        ctx: &PassContext,
        path: &Utf8Path,
        lines: &[String],
    ) -> Result<Rewrite> {
        let needle = ctx.param(params::COMPONENT_NEEDLE).unwrap_or(DEFAULT_NEEDLE);

        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut fixes: Vec<AppliedFix> = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            if line.contains(needle) && !line.trim_start().starts_with('#') {
                let indent = &line[..line.len() - line.trim_start().len()];
                out.push(format!("{indent}{MARKER}"));
                out.push(format!("{indent}# {}", line.trim_start()));
                fixes.push(AppliedFix::new(
                    i + 1,
                    FixKind::CommentedDependency,
                    line.trim(),
                ));
                debug!(file = %path, line = i + 1, "commented out dependency line");
            } else {
                out.push(line.clone());
            }
        }

        Ok(Rewrite { lines: out, fixes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    fn run(src: &[&str]) -> (Vec<String>, usize) {
        let rewrite = CommentComponentDeps
            .rewrite(
                &PassContext::default(),
                Utf8Path::new("BUILD.gn"),
                &lines(src),
            )
            .expect("rewrite");
        (rewrite.lines, rewrite.fixes.len())
    }

    #[test]
    fn comments_out_matching_lines_with_marker() {
        let (out, fixes) = run(&["deps = [", "  \"//acme/components/foo\",", "]"]);
        assert_eq!(fixes, 1);
        assert_eq!(
            out,
            lines(&[
                "deps = [",
                "  # Commented out: removed component dependency - using platform defaults instead",
                "  # \"//acme/components/foo\",",
                "]",
            ])
        );
    }

    #[test]
    fn already_commented_lines_are_skipped() {
        let src = ["  # \"//acme/components/foo\","];
        let (out, fixes) = run(&src);
        assert_eq!(fixes, 0);
        assert_eq!(out, lines(&src));
    }

    #[test]
    fn custom_needle_via_params() {
        let mut map = HashMap::new();
        map.insert(params::COMPONENT_NEEDLE.to_string(), "/widgets/".to_string());
        let ctx = PassContext::new(map);
        let rewrite = CommentComponentDeps
            .rewrite(
                &ctx,
                Utf8Path::new("BUILD.gn"),
                &lines(&["dep = \"//acme/widgets/x\"", "dep2 = \"//acme/components/y\""]),
            )
            .expect("rewrite");
        assert_eq!(rewrite.fixes.len(), 1);
        assert!(rewrite.lines[1].starts_with("# dep ="));
        assert_eq!(rewrite.lines[2], "dep2 = \"//acme/components/y\"");
    }

    #[test]
    fn commenting_is_idempotent() {
        let (once, _) = run(&["x = \"//a/components/b\""]);
        let once_refs: Vec<&str> = once.iter().map(String::as_str).collect();
        let (twice, fixes) = run(&once_refs);
        assert_eq!(fixes, 0);
        assert_eq!(twice, once);
    }
}
