//! Vendor-name substitution passes.
//!
//! `tree.rename_vendor_paths` rewrites only path-shaped references
//! (`/old/`, `src/old`, quoted names). `tree.rename_vendor_all` is the
//! blanket case-variant substitution used late in a rebrand; it spares
//! third-party copyright lines and undoes the common-word collisions the
//! lowercase substitution can produce.

use crate::passes::{PassContext, PassMeta, Rewrite, RewritePass, TEXT_GLOBS, capitalize, params};
use anyhow::{Context, Result};
use camino::Utf8Path;
use forkfix_types::fix::{AppliedFix, FixKind};
use forkfix_types::pass::SafetyClass;
use tracing::debug;

pub(crate) const PATHS_META: PassMeta = PassMeta {
    id: "tree.rename_vendor_paths",
    title: "Rename vendor path references",
    safety: SafetyClass::Guarded,
    description: "Rewrites path-shaped vendor references (`/old/`, `src/old`, \
                  quoted names) to the new vendor across text files.",
    default_globs: TEXT_GLOBS,
    required_params: &[params::VENDOR_OLD, params::VENDOR_NEW],
};

pub(crate) const ALL_META: PassMeta = PassMeta {
    id: "tree.rename_vendor_all",
    title: "Rename every vendor mention",
    safety: SafetyClass::Unsafe,
    description: "Case-variant blanket substitution of the old vendor name, \
                  sparing third-party copyright lines and repairing double \
                  substitutions and common-word collisions.",
    default_globs: TEXT_GLOBS,
    required_params: &[params::VENDOR_OLD, params::VENDOR_NEW],
};

/// Lowercase fragments that preserved copyright/license lines are
/// recognized by.
const COPYRIGHT_FRAGMENTS: &[&str] = &[
    "copyright",
    "(c)",
    "©",
    "mozilla public license",
    "apache license",
    "mit license",
    "bsd license",
    "license, v. 2.0",
    "source code form",
];

/// English suffixes the lowercase substitution can capture when the vendor
/// name is a word prefix (e.g. an adverb or noun built on it).
const COLLISION_SUFFIXES: &[&str] = &["ly", "ry"];

pub struct RenameVendorPaths;

impl RewritePass for RenameVendorPaths {
    fn meta(&self) -> &'static PassMeta {
        &PATHS_META
    }

    fn rewrite(
        &self,
        ctx: &PassContext,
        path: &Utf8Path,
        lines: &[String],
    ) -> Result<Rewrite> {
        let (old, new) = vendor_params(ctx)?;
        let pairs = [
            (format!("/{old}/"), format!("/{new}/")),
            (format!("src/{old}"), format!("src/{new}")),
            (format!("\"{old}\""), format!("\"{new}\"")),
            (format!("'{old}'"), format!("'{new}'")),
        ];

        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut fixes: Vec<AppliedFix> = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            let mut current = line.clone();
            let mut count = 0;
            for (from, to) in &pairs {
                let (next, n) = replace_counting(&current, from, to);
                current = next;
                count += n;
            }
            if count > 0 {
                fixes.push(AppliedFix::new(
                    i + 1,
                    FixKind::Replacement,
                    format!("{count} path reference(s)"),
                ));
                debug!(file = %path, line = i + 1, count, "renamed vendor path references");
            }
            out.push(current);
        }

        Ok(Rewrite { lines: out, fixes })
    }
}

pub struct RenameVendorAll;

impl RewritePass for RenameVendorAll {
    fn meta(&self) -> &'static PassMeta {
        &ALL_META
    }

    fn rewrite(
        &self,
        ctx: &PassContext,
        path: &Utf8Path,
        lines: &[String],
    ) -> Result<Rewrite> {
        let (old, new) = vendor_params(ctx)?;
        let old_lower = old.to_lowercase();
        let new_lower = new.to_lowercase();
        let old_title = capitalize(&old_lower);
        let new_title = capitalize(&new_lower);
        let old_upper = old_lower.to_uppercase();
        let new_upper = new_lower.to_uppercase();

        let variants = [
            (old_lower.clone(), new_lower.clone()),
            (old_title.clone(), new_title.clone()),
            (old_upper.clone(), new_upper.clone()),
        ];

        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut fixes: Vec<AppliedFix> = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            if is_preserved_copyright(line, &old_lower) {
                out.push(line.clone());
                continue;
            }

            let mut current = line.clone();
            let mut count = 0;
            for (from, to) in &variants {
                let (next, n) = replace_counting(&current, from, to);
                current = next;
                count += n;
            }
            if count > 0 {
                // Collapse accidental double substitutions.
                current = current.replace(&format!("{new_lower}{new_lower}"), &new_lower);
                current = current.replace(&format!("{new_title}{new_title}"), &new_title);
                current = current.replace(&format!("{new_upper}{new_upper}"), &new_upper);

                // Restore common words the lowercase substitution captured.
                for suffix in COLLISION_SUFFIXES {
                    current = current.replace(
                        &format!("{new_lower}{suffix}"),
                        &format!("{old_lower}{suffix}"),
                    );
                    current = current.replace(
                        &format!("{new_title}{suffix}"),
                        &format!("{old_title}{suffix}"),
                    );
                }

                fixes.push(AppliedFix::new(
                    i + 1,
                    FixKind::Replacement,
                    format!("{count} vendor mention(s)"),
                ));
                debug!(file = %path, line = i + 1, count, "renamed vendor mentions");
            }
            out.push(current);
        }

        Ok(Rewrite { lines: out, fixes })
    }
}

fn vendor_params<'a>(ctx: &'a PassContext) -> Result<(&'a str, &'a str)> {
    let old = ctx
        .param(params::VENDOR_OLD)
        .with_context(|| format!("missing param {}", params::VENDOR_OLD))?;
    let new = ctx
        .param(params::VENDOR_NEW)
        .with_context(|| format!("missing param {}", params::VENDOR_NEW))?;
    Ok((old, new))
}

fn replace_counting(line: &str, from: &str, to: &str) -> (String, usize) {
    let count = line.matches(from).count();
    if count == 0 {
        (line.to_string(), 0)
    } else {
        (line.replace(from, to), count)
    }
}

/// A third-party copyright/license line kept verbatim — unless it names
/// `The <Vendor> Authors`, which is first-party and still renamed.
fn is_preserved_copyright(line: &str, old_lower: &str) -> bool {
    let lower = line.to_lowercase();
    if !COPYRIGHT_FRAGMENTS.iter().any(|f| lower.contains(f)) {
        return false;
    }
    let first_party = format!("the {old_lower} authors");
    !lower.contains(&first_party)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn ctx() -> PassContext {
        let mut map = HashMap::new();
        map.insert(params::VENDOR_OLD.to_string(), "acme".to_string());
        map.insert(params::VENDOR_NEW.to_string(), "zenith".to_string());
        PassContext::new(map)
    }

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    fn rename_paths(src: &[&str]) -> (Vec<String>, usize) {
        let rewrite = RenameVendorPaths
            .rewrite(&ctx(), Utf8Path::new("a/b.cc"), &lines(src))
            .expect("rewrite");
        (rewrite.lines, rewrite.fixes.len())
    }

    fn rename_all(src: &[&str]) -> (Vec<String>, usize) {
        let rewrite = RenameVendorAll
            .rewrite(&ctx(), Utf8Path::new("a/b.cc"), &lines(src))
            .expect("rewrite");
        (rewrite.lines, rewrite.fixes.len())
    }

    #[test]
    fn path_shapes_are_renamed() {
        let (out, changed_lines) = rename_paths(&[
            "import(\"//acme/build/config.gni\")",
            "#include \"src/acme/common/pref_names.h\"",
            "name = \"acme\"",
            "id = 'acme'",
            "unrelated = \"acmeish\"",
        ]);
        assert_eq!(changed_lines, 4);
        assert_eq!(
            out,
            lines(&[
                "import(\"//zenith/build/config.gni\")",
                "#include \"src/zenith/common/pref_names.h\"",
                "name = \"zenith\"",
                "id = 'zenith'",
                "unrelated = \"acmeish\"",
            ])
        );
    }

    #[test]
    fn blanket_rename_covers_case_variants() {
        let (out, _) = rename_all(&["acme Acme ACME"]);
        assert_eq!(out, lines(&["zenith Zenith ZENITH"]));
    }

    #[test]
    fn third_party_copyright_lines_are_preserved() {
        let src = [
            "// Copyright 2019 The Chromium Authors and acme contributors",
            "// This Source Code Form is subject to the acme terms",
        ];
        let (out, fixes) = rename_all(&src);
        assert_eq!(fixes, 0);
        assert_eq!(out, lines(&src));
    }

    #[test]
    fn first_party_authors_line_is_renamed() {
        let (out, fixes) = rename_all(&["// Copyright 2024 The Acme Authors"]);
        assert_eq!(fixes, 1);
        assert_eq!(out, lines(&["// Copyright 2024 The Zenith Authors"]));
    }

    #[test]
    fn double_substitutions_are_collapsed() {
        // `acmeacme` would otherwise become `zenithzenith`.
        let (out, _) = rename_all(&["path/acmeacme/x"]);
        assert_eq!(out, lines(&["path/zenith/x"]));
    }

    #[test]
    fn word_collisions_are_restored() {
        let (out, _) = rename_all(&["they fought acmely with acmery near acme"]);
        assert_eq!(out, lines(&["they fought acmely with acmery near zenith"]));
    }

    #[test]
    fn counts_are_per_line_totals() {
        let rewrite = RenameVendorPaths
            .rewrite(
                &ctx(),
                Utf8Path::new("x.gn"),
                &lines(&["deps = [ \"//acme/a\", \"//acme/b\" ]"]),
            )
            .expect("rewrite");
        assert_eq!(rewrite.fixes.len(), 1);
        assert_eq!(rewrite.fixes[0].subject, "2 path reference(s)");
    }

    #[test]
    fn missing_params_are_an_error() {
        let err = RenameVendorAll
            .rewrite(
                &PassContext::default(),
                Utf8Path::new("x.gn"),
                &lines(&["acme"]),
            )
            .expect_err("params required");
        assert!(err.to_string().contains("vendor_old"));
    }
}
