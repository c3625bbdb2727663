use anyhow::{Context, Result};
use catchfix::config::{self, RewriteConfig};
use catchfix::{run, FileOutcome, RunError, RunOptions};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::env;
use std::path::{Path, PathBuf};

const SEPARATOR_WIDTH: usize = 60;

#[derive(Parser)]
#[command(name = "catchfix")]
#[command(about = "Replace empty catch blocks with error-handler calls", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite empty catch blocks in place
    Apply {
        #[command(flatten)]
        target: TargetArgs,

        /// Dry run - show what would be changed without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List empty catch blocks without modifying anything
    Scan {
        #[command(flatten)]
        target: TargetArgs,

        /// Print the findings as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// Config file (defaults to ./catchfix.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root directory containing the target subdirectories
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Subdirectory of the root to rewrite (repeatable; replaces the configured list)
    #[arg(long = "dir", value_name = "NAME")]
    dirs: Vec<String>,

    /// File extension to rewrite
    #[arg(long = "ext", value_name = "EXT")]
    extension: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            target,
            dry_run,
            diff,
            json,
        } => cmd_apply(target, dry_run, diff, json),

        Commands::Scan { target, json } => cmd_scan(target, json),
    }
}

/// Helper: Load the config and apply command-line overrides.
fn resolve_config(args: TargetArgs, quiet: bool) -> Result<RewriteConfig> {
    let cwd = env::current_dir().context("cannot determine current directory")?;
    let (mut config, source) = config::discover(args.config.as_deref(), &cwd)?;

    if let (Some(path), false) = (source, quiet) {
        println!("{}", format!("Config: {}", path.display()).dimmed());
    }

    if let Some(root) = args.root {
        config.target.root = root;
    }
    if !args.dirs.is_empty() {
        config.target.directories = args.dirs;
    }
    if let Some(extension) = args.extension {
        config.target.extension = extension;
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid options: {e}"))?;

    Ok(config)
}

/// Helper: Display name used in per-file lines.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Helper: Show unified diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    let mut unified = diff.unified_diff();
    unified.context_radius(3);

    for hunk in unified.iter_hunks() {
        println!("{}", hunk.header().to_string().cyan());
        for change in hunk.iter_changes() {
            let line = match change.tag() {
                ChangeTag::Delete => format!("-{}", change).red(),
                ChangeTag::Insert => format!("+{}", change).green(),
                ChangeTag::Equal => format!(" {}", change).normal(),
            };
            print!("{}", line);
            if change.missing_newline() {
                println!();
            }
        }
    }
}

/// Helper: Report failed and skipped files.
fn report_problem(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Failed { .. } => println!("{} {}", "✗".red(), outcome),
        FileOutcome::Skipped { .. } => println!("{} {}", "⊘".yellow(), outcome),
        FileOutcome::Fixed(_) | FileOutcome::Unchanged { .. } => {}
    }
}

/// Failed and skipped files collected for JSON output.
#[derive(Default)]
struct Problems {
    failures: Vec<serde_json::Value>,
    skipped: Vec<serde_json::Value>,
}

impl Problems {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Failed { path, reason } => self
                .failures
                .push(serde_json::json!({ "path": path, "reason": reason })),
            FileOutcome::Skipped { path, reason } => self
                .skipped
                .push(serde_json::json!({ "path": path, "reason": reason })),
            FileOutcome::Fixed(_) | FileOutcome::Unchanged { .. } => {}
        }
    }
}

/// Helper: Report a missing root. The run ends normally.
fn report_root_error(err: RunError, json: bool) -> Result<()> {
    match err {
        RunError::RootNotFound(_) if json => {
            let report = serde_json::json!({ "error": err.to_string() });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        RunError::RootNotFound(path) => {
            println!(
                "{}",
                format!("Error: root directory not found: {}", path.display()).red()
            );
            Ok(())
        }
        other => Err(other.into()),
    }
}

fn print_boxed(line: &str) {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    println!();
    println!("{}", separator);
    println!("{}", line);
    println!("{}", separator);
}

fn cmd_apply(target: TargetArgs, dry_run: bool, show_diff: bool, json: bool) -> Result<()> {
    let config = resolve_config(target, json)?;
    let options = RunOptions { dry_run };

    if dry_run && !json {
        println!("{}", "[DRY RUN - no files will be modified]".cyan());
    }

    let mut changed_files = Vec::new();
    let mut problems = Problems::default();

    let result = run(&config, &options, |outcome| {
        if let FileOutcome::Fixed(fix) = outcome {
            if json {
                changed_files.push(serde_json::json!({
                    "path": fix.path,
                    "fixes": fix.fixes,
                }));
                return;
            }

            let verb = if dry_run { "Would fix" } else { "Fixed" };
            println!(
                "{} {} {} empty catch blocks in {}",
                "✓".green(),
                verb,
                fix.count(),
                file_name(&fix.path)
            );
            if show_diff {
                display_diff(&fix.path, &fix.original, &fix.rewritten);
            }
        } else if json {
            problems.record(outcome);
        } else {
            report_problem(outcome);
        }
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(err) => return report_root_error(err, json),
    };

    if json {
        let report = serde_json::json!({
            "summary": summary,
            "files": changed_files,
            "failures": problems.failures,
            "skipped": problems.skipped,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let verb = if dry_run { "Would fix" } else { "Fixed" };
    print_boxed(&format!(
        "Summary: {} {} empty catch blocks across {} files",
        verb, summary.replacements, summary.files_changed
    ));

    if summary.files_failed > 0 {
        println!(
            "{}",
            format!("{} files could not be processed", summary.files_failed).red()
        );
    }

    Ok(())
}

fn cmd_scan(target: TargetArgs, json: bool) -> Result<()> {
    let config = resolve_config(target, json)?;
    let options = RunOptions { dry_run: true };

    let mut findings = Vec::new();
    let mut problems = Problems::default();

    let result = run(&config, &options, |outcome| {
        if let FileOutcome::Fixed(fix) = outcome {
            for applied in &fix.fixes {
                if json {
                    findings.push(serde_json::json!({
                        "path": fix.path,
                        "line": applied.line,
                        "shape": applied.shape,
                        "method": applied.method,
                        "used_fallback": applied.used_fallback,
                    }));
                } else {
                    let method = if applied.used_fallback {
                        applied.method.yellow()
                    } else {
                        applied.method.normal()
                    };
                    println!(
                        "{}:{}  {}  {}",
                        fix.path.display(),
                        applied.line,
                        applied.shape.to_string().dimmed(),
                        method
                    );
                }
            }
        } else if json {
            problems.record(outcome);
        } else {
            report_problem(outcome);
        }
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(err) => return report_root_error(err, json),
    };

    if json {
        let report = serde_json::json!({
            "summary": summary,
            "findings": findings,
            "failures": problems.failures,
            "skipped": problems.skipped,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_boxed(&format!(
        "Found {} empty catch blocks across {} files",
        summary.replacements, summary.files_changed
    ));

    Ok(())
}
