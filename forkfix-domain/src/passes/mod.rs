use camino::Utf8Path;
use forkfix_types::fix::AppliedFix;
use forkfix_types::pass::{PassId, SafetyClass};
use std::collections::HashMap;

mod comment_components;
mod guard_imports;
mod repair_assignments;
mod seed_empty_arrays;
mod vendor_rename;

/// Marker comment prefix emitted by `gn.seed_empty_arrays` and recognized
/// by `gn.repair_malformed_assignments` above a seeded empty array.
/// Matched by prefix so markers seeded for any vendor name are recognized.
pub const EMPTY_ARRAY_MARKER_PREFIX: &str = "# Initialize as empty array since";

/// Well-known pass parameter keys.
pub mod params {
    /// The vendor name being removed (lowercase), e.g. the fork's upstream brand.
    pub const VENDOR_OLD: &str = "vendor_old";
    /// The vendor name replacing it (lowercase).
    pub const VENDOR_NEW: &str = "vendor_new";
    /// Substring marking a dependency line for commenting out.
    pub const COMPONENT_NEEDLE: &str = "component_needle";
}

/// Default file sets per pass family.
pub(crate) const GN_GLOBS: &[&str] = &["**/BUILD.gn", "**/*.gni"];
pub(crate) const BUILD_GLOBS: &[&str] = &["**/BUILD.gn"];
pub(crate) const TEXT_GLOBS: &[&str] = &[
    "**/*.gn",
    "**/*.gni",
    "**/*.cc",
    "**/*.cpp",
    "**/*.h",
    "**/*.hpp",
    "**/*.js",
    "**/*.ts",
    "**/*.py",
    "**/*.json",
    "**/*.md",
    "**/*.txt",
    "**/*.yaml",
    "**/*.yml",
    "**/*.toml",
];

/// Static description of a pass: identity, gating, and default file set.
#[derive(Debug, Clone, Copy)]
pub struct PassMeta {
    pub id: &'static str,
    pub title: &'static str,
    pub safety: SafetyClass,
    pub description: &'static str,
    pub default_globs: &'static [&'static str],
    pub required_params: &'static [&'static str],
}

impl PassMeta {
    pub fn pass_id(&self) -> PassId {
        PassId::new(self.id)
    }
}

/// Parameters threaded into every pass invocation.
#[derive(Debug, Clone, Default)]
pub struct PassContext {
    params: HashMap<String, String>,
}

impl PassContext {
    pub fn new(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Required params of `meta` that are absent from this context.
    pub fn missing_params(&self, meta: &PassMeta) -> Vec<&'static str> {
        meta.required_params
            .iter()
            .copied()
            .filter(|key| !self.params.contains_key(*key))
            .collect()
    }
}

/// Result of rewriting one file's line sequence.
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub lines: Vec<String>,
    pub fixes: Vec<AppliedFix>,
}

impl Rewrite {
    pub fn is_modified(&self) -> bool {
        !self.fixes.is_empty()
    }
}

/// A single batch rewrite job over one file's lines.
///
/// Implementations are pure with respect to the filesystem and keep no
/// state across files; the path is only for diagnostics.
pub trait RewritePass: Send + Sync {
    fn meta(&self) -> &'static PassMeta;

    fn rewrite(&self, ctx: &PassContext, path: &Utf8Path, lines: &[String])
    -> anyhow::Result<Rewrite>;
}

/// All passes, in execution order.
pub fn builtin_passes() -> Vec<Box<dyn RewritePass>> {
    vec![
        Box::new(seed_empty_arrays::SeedEmptyArrays),
        Box::new(repair_assignments::RepairMalformedAssignments),
        Box::new(comment_components::CommentComponentDeps),
        Box::new(guard_imports::GuardVendorImports),
        Box::new(vendor_rename::RenameVendorPaths),
        Box::new(vendor_rename::RenameVendorAll),
    ]
}

pub fn builtin_pass_metas() -> Vec<&'static PassMeta> {
    vec![
        &seed_empty_arrays::META,
        &repair_assignments::META,
        &comment_components::META,
        &guard_imports::META,
        &vendor_rename::PATHS_META,
        &vendor_rename::ALL_META,
    ]
}

/// Look up a pass by id.
pub fn find_pass(id: &str) -> Option<Box<dyn RewritePass>> {
    builtin_passes().into_iter().find(|p| p.meta().id == id)
}

/// Uppercase the first character, for marker prose.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_and_metas_agree() {
        let passes = builtin_passes();
        let metas = builtin_pass_metas();
        assert_eq!(passes.len(), metas.len());
        for (pass, meta) in passes.iter().zip(&metas) {
            assert_eq!(pass.meta().id, meta.id);
        }
    }

    #[test]
    fn pass_ids_are_unique() {
        let mut ids: Vec<&str> = builtin_pass_metas().iter().map(|m| m.id).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn find_pass_by_id() {
        assert!(find_pass("gn.repair_malformed_assignments").is_some());
        assert!(find_pass("nope").is_none());
    }

    #[test]
    fn missing_params_reports_absent_keys() {
        let meta = PassMeta {
            id: "test.pass",
            title: "test",
            safety: SafetyClass::Safe,
            description: "",
            default_globs: GN_GLOBS,
            required_params: &[params::VENDOR_OLD, params::VENDOR_NEW],
        };

        let mut map = HashMap::new();
        map.insert(params::VENDOR_OLD.to_string(), "acme".to_string());
        let ctx = PassContext::new(map);

        assert_eq!(ctx.missing_params(&meta), vec![params::VENDOR_NEW]);
        assert_eq!(ctx.param(params::VENDOR_OLD), Some("acme"));
    }

    #[test]
    fn capitalize_first_char() {
        assert_eq!(capitalize("acme"), "Acme");
        assert_eq!(capitalize(""), "");
    }
}
