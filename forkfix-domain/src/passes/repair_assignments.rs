//! Repairs the three malformed-assignment shapes a prior mechanical edit
//! leaves behind in GN files:
//!
//! 1. `name = [` / `]` / orphaned value — the value lost its assignment and
//!    the variable got an empty array instead.
//! 2. The same shape preceded by the seeding pass's marker comment.
//! 3. A bare `name =` whose value sits alone on the following line.
//!
//! Single forward scan; patterns are tried in the order above at each
//! position and the first match wins. Every input line is either copied
//! verbatim or consumed by exactly one pattern.

use crate::passes::{
    EMPTY_ARRAY_MARKER_PREFIX, GN_GLOBS, PassContext, PassMeta, Rewrite, RewritePass,
};
use anyhow::Result;
use camino::Utf8Path;
use forkfix_gn::{LineKind, ValueShape, classify, classify_value, is_bare_value};
use forkfix_types::fix::{AppliedFix, FixKind};
use forkfix_types::pass::SafetyClass;
use tracing::{debug, warn};

pub(crate) const META: PassMeta = PassMeta {
    id: "gn.repair_malformed_assignments",
    title: "Repair malformed GN assignments",
    safety: SafetyClass::Safe,
    description: "Collapses empty-array assignments followed by an orphaned value \
                  (with or without the seeding marker comment) and completes bare \
                  `name =` assignments from the line below them.",
    default_globs: GN_GLOBS,
    required_params: &[],
};

pub struct RepairMalformedAssignments;

/// A bare `name =` held back until the next line shows whether it should be
/// amended with a trailing value or flushed verbatim.
struct Pending {
    raw: String,
    indent: String,
    name: String,
}

impl RewritePass for RepairMalformedAssignments {
    fn meta(&self) -> &'static PassMeta {
        &META
    }

    fn rewrite(
        &self,
        _ctx: &PassContext,
        path: &Utf8Path,
        lines: &[String],
    ) -> Result<Rewrite> {
        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut fixes: Vec<AppliedFix> = Vec::new();
        let mut pending: Option<Pending> = None;

        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];

            // Pattern 1: empty array + orphaned value.
            if let LineKind::ArrayOpen(open) = classify(line) {
                if close_at(lines, i + 1) && bare_at(lines, i + 2) {
                    flush(&mut out, &mut pending);
                    let value = lines[i + 2].trim();
                    out.push(assign_or_quote(path, open.indent, open.name, value));
                    fixes.push(AppliedFix::new(i + 1, FixKind::EmptyArrayValue, open.name));
                    debug!(file = %path, variable = open.name, "repaired empty-array assignment");
                    i += 3;
                    continue;
                }
            }

            // Pattern 2: marker comment + empty array + orphaned value.
            if line.trim().starts_with(EMPTY_ARRAY_MARKER_PREFIX) {
                if let Some(LineKind::ArrayOpen(open)) = lines.get(i + 1).map(|l| classify(l)) {
                    if close_at(lines, i + 2) && bare_at(lines, i + 3) {
                        flush(&mut out, &mut pending);
                        let value = lines[i + 3].trim();
                        out.push(assign_marked(path, open.indent, open.name, value));
                        fixes.push(AppliedFix::new(
                            i + 1,
                            FixKind::MarkedEmptyArrayValue,
                            open.name,
                        ));
                        debug!(file = %path, variable = open.name, "repaired marked empty-array assignment");
                        i += 4;
                        continue;
                    }
                }
            }

            // Pattern 3: amend the buffered incomplete assignment with the
            // value found on this line.
            if pending.is_some() && is_bare_value(line) {
                let p = pending.take().expect("pending checked above");
                let value = line.trim();
                out.push(assign_or_quote(path, &p.indent, &p.name, value));
                fixes.push(AppliedFix::new(i + 1, FixKind::TrailingValue, p.name));
                debug!(file = %path, "completed dangling assignment");
                i += 1;
                continue;
            }

            flush(&mut out, &mut pending);
            if let LineKind::Incomplete(a) = classify(line) {
                pending = Some(Pending {
                    raw: line.clone(),
                    indent: a.indent.to_string(),
                    name: a.name.to_string(),
                });
            } else {
                out.push(line.clone());
            }
            i += 1;
        }
        flush(&mut out, &mut pending);

        Ok(Rewrite { lines: out, fixes })
    }
}

fn close_at(lines: &[String], idx: usize) -> bool {
    lines
        .get(idx)
        .map(|l| matches!(classify(l), LineKind::ArrayClose))
        .unwrap_or(false)
}

fn bare_at(lines: &[String], idx: usize) -> bool {
    lines.get(idx).map(|l| is_bare_value(l)).unwrap_or(false)
}

fn flush(out: &mut Vec<String>, pending: &mut Option<Pending>) {
    if let Some(p) = pending.take() {
        out.push(p.raw);
    }
}

/// Patterns 1 and 3: array and string literals pass through verbatim,
/// anything else is force-quoted.
fn assign_or_quote(path: &Utf8Path, indent: &str, name: &str, value: &str) -> String {
    match classify_value(value) {
        ValueShape::Array | ValueShape::Quoted => format!("{indent}{name} = {value}"),
        _ => {
            warn!(
                file = %path,
                variable = name,
                value,
                "force-quoting dangling value; shape could not be established from the line alone"
            );
            format!("{indent}{name} = \"{value}\"")
        }
    }
}

/// Pattern 2 refinement: a lone quoted value goes back into a
/// single-element array; expression- and reference-shaped tokens are
/// assigned verbatim; the rest is force-quoted.
fn assign_marked(path: &Utf8Path, indent: &str, name: &str, value: &str) -> String {
    match classify_value(value) {
        ValueShape::Array => format!("{indent}{name} = {value}"),
        ValueShape::Quoted => format!("{indent}{name} = [ {value} ]"),
        ValueShape::Expression | ValueShape::Reference => {
            warn!(
                file = %path,
                variable = name,
                value,
                "assigning dangling value as a reference or expression; shape guessed from the line alone"
            );
            format!("{indent}{name} = {value}")
        }
        ValueShape::Plain => {
            warn!(
                file = %path,
                variable = name,
                value,
                "force-quoting dangling value; shape could not be established from the line alone"
            );
            format!("{indent}{name} = \"{value}\"")
        }
    }
}
