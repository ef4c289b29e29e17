//! Comments out `import("//<vendor>/...")` statements in BUILD.gn files so
//! builds outside the vendor tree stop pulling vendor .gni files.

use crate::passes::{BUILD_GLOBS, PassContext, PassMeta, Rewrite, RewritePass, params};
use anyhow::{Context, Result};
use camino::Utf8Path;
use forkfix_types::fix::{AppliedFix, FixKind};
use forkfix_types::pass::SafetyClass;
use tracing::debug;

pub(crate) const META: PassMeta = PassMeta {
    id: "gn.guard_vendor_imports",
    title: "Comment out vendor import statements",
    safety: SafetyClass::Guarded,
    description: "Comments out uncommented `import(\"//<vendor>/...\")` lines in \
                  BUILD.gn files, preserving indentation.",
    default_globs: BUILD_GLOBS,
    required_params: &[params::VENDOR_NEW],
};

pub struct GuardVendorImports;

impl RewritePass for GuardVendorImports {
    fn meta(&self) -> &'static PassMeta {
        &META
    }

    fn rewrite(
        &self,
        ctx: &PassContext,
        path: &Utf8Path,
        lines: &[String],
    ) -> Result<Rewrite> {
        let vendor = ctx
            .param(params::VENDOR_NEW)
            .with_context(|| format!("missing param {}", params::VENDOR_NEW))?;
        let prefix = format!("import(\"//{vendor}/");

        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut fixes: Vec<AppliedFix> = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim_start();
            if trimmed.starts_with(&prefix) {
                let indent = &line[..line.len() - trimmed.len()];
                out.push(format!("{indent}# {trimmed}"));
                fixes.push(AppliedFix::new(i + 1, FixKind::GuardedImport, trimmed));
                debug!(file = %path, line = i + 1, "commented out vendor import");
            } else {
                out.push(line.clone());
            }
        }

        Ok(Rewrite { lines: out, fixes })
    }
}
