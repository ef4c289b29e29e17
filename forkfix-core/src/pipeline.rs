//! The rewrite pipeline, extracted from the CLI.
//!
//! Runs the registered passes over a tree: per pass, discover files, then
//! read → rewrite → write each file. Files are independent; a failure on
//! one file is recorded and the batch continues. Nothing is shared across
//! files, so per-file results do not depend on processing order.

use crate::policy;
use crate::ports::{FileDiscovery, WritePort};
use crate::settings::RunSettings;
use anyhow::Context;
use camino::Utf8Path;
use chrono::Utc;
use forkfix_domain::{PassContext, RewritePass, builtin_passes};
use forkfix_types::report::{
    Counts, FileOutcome, FileStatus, PassOutcome, PassStatus, RunReport, RunStatus, ToolInfo,
};
use tracing::{debug, warn};

/// Outcome of `run_rewrites`.
pub struct RunOutcome {
    pub report: RunReport,
    pub patch: String,
}

/// Run every registered pass allowed by policy over the tree.
pub fn run_rewrites(
    settings: &RunSettings,
    discovery: &dyn FileDiscovery,
    tool: ToolInfo,
) -> anyhow::Result<RunOutcome> {
    let started = std::time::Instant::now();
    let ctx = PassContext::new(settings.params.clone());

    let passes = builtin_passes();
    let mut report = RunReport::new(tool);
    report.summary.passes_selected = passes.len() as u64;

    let mut patch = String::new();
    let mut warn_skips: u64 = 0;

    for pass in &passes {
        let meta = pass.meta();

        if let Some(skip) = policy::skip_for(meta, settings, &ctx) {
            debug!(pass = meta.id, reason = %skip.reason(), "pass skipped");
            if skip.is_warning() {
                warn_skips += 1;
            }
            report.summary.passes_skipped += 1;
            report.passes.push(PassOutcome {
                pass: meta.pass_id(),
                safety: meta.safety,
                status: PassStatus::Skipped,
                reason: Some(skip.reason()),
                files: vec![],
            });
            continue;
        }

        let files = discovery
            .discover(&settings.root, meta.default_globs)
            .with_context(|| format!("discover files for {}", meta.id))?;

        if let Some(max) = settings.max_files {
            if files.len() as u64 > max {
                warn!(
                    pass = meta.id,
                    files = files.len(),
                    max, "file cap exceeded; pass skipped"
                );
                warn_skips += 1;
                report.summary.passes_skipped += 1;
                report.passes.push(PassOutcome {
                    pass: meta.pass_id(),
                    safety: meta.safety,
                    status: PassStatus::Skipped,
                    reason: Some(format!(
                        "cap exceeded: {} files > {} allowed",
                        files.len(),
                        max
                    )),
                    files: vec![],
                });
                continue;
            }
        }

        let mut outcome = PassOutcome {
            pass: meta.pass_id(),
            safety: meta.safety,
            status: PassStatus::Ran,
            reason: None,
            files: Vec::with_capacity(files.len()),
        };

        for rel in &files {
            report.summary.files_scanned += 1;
            let file_outcome = process_file(pass.as_ref(), &ctx, settings, rel, &mut patch);
            match file_outcome.status {
                FileStatus::Modified => report.summary.files_modified += 1,
                FileStatus::Failed => report.summary.files_failed += 1,
                FileStatus::Unchanged => {}
            }
            report.summary.fixes_applied += file_outcome.fixes;
            outcome.files.push(file_outcome);
        }

        report.summary.passes_run += 1;
        report.passes.push(outcome);
    }

    report.verdict.status = if report.summary.files_failed > 0 {
        RunStatus::Fail
    } else if warn_skips > 0 {
        RunStatus::Warn
    } else {
        RunStatus::Pass
    };
    report.verdict.counts = Counts {
        info: report.summary.fixes_applied,
        warn: warn_skips,
        error: report.summary.files_failed,
    };
    if warn_skips > 0 {
        report.verdict.reasons.push("passes_skipped".to_string());
    }
    if report.summary.files_failed > 0 {
        report.verdict.reasons.push("file_errors".to_string());
    }

    report.run.ended_at = Some(Utc::now().to_rfc3339());
    report.run.duration_ms = Some(started.elapsed().as_millis() as u64);

    Ok(RunOutcome { report, patch })
}

/// Read, rewrite, and (unless dry-run) persist one file for one pass.
/// Errors are folded into the outcome; they never abort the batch.
fn process_file(
    pass: &dyn RewritePass,
    ctx: &PassContext,
    settings: &RunSettings,
    rel: &Utf8Path,
    patch: &mut String,
) -> FileOutcome {
    let abs = settings.root.join(rel);

    if forkfix_edit::is_binary_file(&abs) {
        debug!(file = %rel, "binary file skipped");
        return unchanged(rel);
    }

    let src = match forkfix_edit::read_source(&abs) {
        Ok(src) => src,
        Err(e) => {
            warn!(file = %rel, error = %e, "file skipped");
            return failed(rel, &e.to_string());
        }
    };

    let rewrite = match pass.rewrite(ctx, rel, &src.lines) {
        Ok(r) => r,
        Err(e) => {
            warn!(file = %rel, error = %e, "pass failed on file");
            return failed(rel, &format!("{e:#}"));
        }
    };

    if !rewrite.is_modified() {
        return unchanged(rel);
    }

    let before = src.content();
    let after = src.render(&rewrite.lines);
    patch.push_str(&forkfix_edit::render_file_patch(rel, &before, &after));

    if !settings.dry_run {
        if settings.backup.enabled {
            if let Err(e) = forkfix_edit::backup(&abs, &settings.backup.suffix) {
                warn!(file = %rel, error = %e, "backup failed; file left untouched");
                return failed(rel, &e.to_string());
            }
        }
        if let Err(e) = forkfix_edit::write_atomic(&abs, &after) {
            warn!(file = %rel, error = %e, "write failed; file left untouched");
            return failed(rel, &e.to_string());
        }
    }

    let mut subjects: Vec<String> = Vec::new();
    for fix in &rewrite.fixes {
        if !subjects.contains(&fix.subject) {
            subjects.push(fix.subject.clone());
        }
    }

    FileOutcome {
        path: rel.to_string(),
        status: FileStatus::Modified,
        fixes: rewrite.fixes.len() as u64,
        subjects,
        before_sha256: Some(forkfix_edit::sha256_hex(before.as_bytes())),
        after_sha256: Some(forkfix_edit::sha256_hex(after.as_bytes())),
        error: None,
    }
}

fn unchanged(rel: &Utf8Path) -> FileOutcome {
    FileOutcome {
        path: rel.to_string(),
        status: FileStatus::Unchanged,
        fixes: 0,
        subjects: vec![],
        before_sha256: None,
        after_sha256: None,
        error: None,
    }
}

fn failed(rel: &Utf8Path, message: &str) -> FileOutcome {
    FileOutcome {
        path: rel.to_string(),
        status: FileStatus::Failed,
        fixes: 0,
        subjects: vec![],
        before_sha256: None,
        after_sha256: None,
        error: Some(message.to_string()),
    }
}

/// Write `report.json` and `patch.diff` to the out dir.
pub fn write_run_artifacts(
    outcome: &RunOutcome,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let report_json =
        serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;
    writer.write_file(&out_dir.join("patch.diff"), outcome.patch.as_bytes())?;

    Ok(())
}
