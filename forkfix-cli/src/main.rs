mod config;
mod explain;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::ConfigMerger;
use forkfix_core::adapters::{FsWritePort, GlobDiscovery};
use forkfix_core::pipeline::{run_rewrites, write_run_artifacts};
use forkfix_core::settings::{BackupSettings, RunSettings};
use forkfix_domain::builtin_pass_metas;
use forkfix_types::pass::SafetyClass;
use forkfix_types::report::{PassStatus, ToolInfo};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "forkfix",
    version,
    about = "Batch rewrite toolkit for de-branding a browser fork's GN build tree."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run rewrite passes over a tree and write report artifacts.
    Run(RunArgs),
    /// List all rewrite passes with their safety classifications.
    ListPasses(ListPassesArgs),
    /// Explain what a pass does, its safety rationale, and its parameters.
    Explain(ExplainArgs),
}

#[derive(Debug, Parser)]
struct RunArgs {
    /// Tree root to rewrite (default: current directory).
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// Output directory for artifacts (default: <root>/.forkfix).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Allowlist patterns for pass ids (e.g. `gn.*`). May repeat.
    #[arg(long = "pass")]
    passes: Vec<String>,

    /// Denylist patterns for pass ids. May repeat.
    #[arg(long)]
    deny: Vec<String>,

    /// Report and diff without writing any file.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Create a .bak copy of each file before rewriting it.
    #[arg(long, default_value_t = false)]
    backup: bool,

    /// Allow guarded passes to run.
    #[arg(long, default_value_t = false)]
    allow_guarded: bool,

    /// Allow unsafe passes to run.
    #[arg(long, default_value_t = false)]
    allow_unsafe: bool,

    /// Pass parameters as key=value (e.g. vendor_old=acme). May repeat.
    #[arg(long = "param")]
    params: Vec<String>,

    /// Skip a pass whose file set exceeds this many files.
    #[arg(long)]
    max_files: Option<u64>,
}

#[derive(Debug, Parser)]
struct ListPassesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Pass id to explain (e.g. "gn.repair_malformed_assignments").
    pass_id: String,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::ListPasses(args) => cmd_list_passes(args),
        Command::Explain(args) => cmd_explain(args),
    }
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "forkfix".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: None,
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let root = args.root;
    let out_dir = args.out_dir.unwrap_or_else(|| root.join(".forkfix"));

    let file_config = config::load_or_default(&root).context("load forkfix.toml config")?;
    let cli_params = config::parse_cli_params(&args.params)?;
    let merged = ConfigMerger::new(file_config).merge_run_args(
        &args.passes,
        &args.deny,
        args.allow_guarded,
        args.allow_unsafe,
        args.backup,
        args.max_files,
        &cli_params,
    );

    debug!(
        "merged config: allow={:?}, deny={:?}, allow_guarded={}, allow_unsafe={}, max_files={:?}",
        merged.allow, merged.deny, merged.allow_guarded, merged.allow_unsafe, merged.max_files
    );

    let settings = RunSettings {
        root: root.clone(),
        out_dir: out_dir.clone(),
        allow: merged.allow,
        deny: merged.deny,
        allow_guarded: merged.allow_guarded,
        allow_unsafe: merged.allow_unsafe,
        max_files: merged.max_files,
        dry_run: args.dry_run,
        backup: BackupSettings {
            enabled: merged.backup_enabled,
            suffix: merged.backup_suffix,
        },
        params: merged.params,
    };

    let outcome = run_rewrites(&settings, &GlobDiscovery, tool_info()).context("run passes")?;
    write_run_artifacts(&outcome, &out_dir, &FsWritePort).context("write artifacts")?;

    for pass in &outcome.report.passes {
        match pass.status {
            PassStatus::Ran => {
                let modified = pass
                    .files
                    .iter()
                    .filter(|f| f.status == forkfix_types::report::FileStatus::Modified)
                    .count();
                let fixes: u64 = pass.files.iter().map(|f| f.fixes).sum();
                println!(
                    "pass {}: {} of {} file(s) modified, {} fix(es)",
                    pass.pass,
                    modified,
                    pass.files.len(),
                    fixes
                );
            }
            PassStatus::Skipped => {
                println!(
                    "pass {}: skipped ({})",
                    pass.pass,
                    pass.reason.as_deref().unwrap_or("no reason")
                );
            }
        }
    }

    let summary = &outcome.report.summary;
    if args.dry_run {
        println!(
            "dry-run: {} file(s) would be modified, {} fix(es); nothing written",
            summary.files_modified, summary.fixes_applied
        );
    } else {
        println!(
            "{} file(s) modified, {} fix(es) applied",
            summary.files_modified, summary.fixes_applied
        );
    }
    if summary.files_failed > 0 {
        println!("{} file(s) failed; see {}/report.json", summary.files_failed, out_dir);
    }
    println!("report: {}/report.json", out_dir);

    Ok(())
}

fn cmd_list_passes(args: ListPassesArgs) -> anyhow::Result<()> {
    let metas = builtin_pass_metas();
    match args.format {
        OutputFormat::Text => {
            for meta in metas {
                let safety = match meta.safety {
                    SafetyClass::Safe => "safe",
                    SafetyClass::Guarded => "guarded",
                    SafetyClass::Unsafe => "unsafe",
                };
                println!("{:<34} [{safety}] {}", meta.id, meta.title);
            }
        }
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = metas
                .iter()
                .map(|meta| {
                    serde_json::json!({
                        "id": meta.id,
                        "title": meta.title,
                        "safety": meta.safety,
                        "description": meta.description,
                        "default_globs": meta.default_globs,
                        "required_params": meta.required_params,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    let text = explain::explain(&args.pass_id)?;
    print!("{text}");
    Ok(())
}
