//! Human-readable pass explanations for `forkfix explain`.

use anyhow::bail;
use forkfix_domain::builtin_pass_metas;
use forkfix_types::pass::SafetyClass;

/// Compose the explanation text for one pass id.
pub fn explain(pass_id: &str) -> anyhow::Result<String> {
    let meta = match builtin_pass_metas().into_iter().find(|m| m.id == pass_id) {
        Some(meta) => meta,
        None => {
            let known: Vec<&str> = builtin_pass_metas().iter().map(|m| m.id).collect();
            bail!(
                "unknown pass '{}'. Known passes: {}",
                pass_id,
                known.join(", ")
            );
        }
    };

    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", meta.title, meta.id));
    out.push_str(&format!(
        "safety: {}\n",
        match meta.safety {
            SafetyClass::Safe => "safe - narrow line patterns, no configuration is disabled",
            SafetyClass::Guarded =>
                "guarded - comments out or rewrites live build configuration; requires --allow-guarded",
            SafetyClass::Unsafe =>
                "unsafe - broad textual substitution with known misfire modes; requires --allow-unsafe",
        }
    ));
    out.push_str(&format!("files: {}\n", meta.default_globs.join(", ")));
    if !meta.required_params.is_empty() {
        out.push_str(&format!(
            "required params: {}\n",
            meta.required_params.join(", ")
        ));
    }
    out.push('\n');
    out.push_str(meta.description);
    out.push('\n');

    if let Some(guidance) = guidance(meta.id) {
        out.push('\n');
        out.push_str(guidance);
        out.push('\n');
    }

    Ok(out)
}

fn guidance(pass_id: &str) -> Option<&'static str> {
    match pass_id {
        "gn.repair_malformed_assignments" => Some(
            "Values that are neither array nor string literals are classified by a \
             line-text heuristic and may be misjudged; every such decision is logged \
             as a warning. Review the patch before committing.",
        ),
        "gn.seed_empty_arrays" => Some(
            "Runs before the repair pass: the marker comment it leaves is what the \
             repair pass keys on when a dangling value follows the seeded array.",
        ),
        "gn.comment_component_deps" => Some(
            "Pass a different needle with --param component_needle=<substring> to \
             target other dependency families.",
        ),
        "tree.rename_vendor_all" => Some(
            "Third-party copyright lines are preserved; `The <vendor> Authors` is \
             treated as first-party and renamed. Run with --dry-run first and read \
             the patch.",
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explains_every_registered_pass() {
        for meta in builtin_pass_metas() {
            let text = explain(meta.id).expect("explain");
            assert!(text.contains(meta.id));
            assert!(text.contains("safety:"));
        }
    }

    #[test]
    fn mentions_required_params() {
        let text = explain("tree.rename_vendor_paths").expect("explain");
        assert!(text.contains("vendor_old"));
        assert!(text.contains("vendor_new"));
    }

    #[test]
    fn unknown_pass_lists_known_ids() {
        let err = explain("gn.nope").expect_err("unknown");
        assert!(err.to_string().contains("Known passes"));
        assert!(err.to_string().contains("gn.repair_malformed_assignments"));
    }
}
