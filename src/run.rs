//! Whole-tree runs: discover files, rewrite each one, keep the totals.
//!
//! Failures are contained per file. The only condition that stops a run
//! before any file is touched is a missing root directory.

use crate::config::RewriteConfig;
use crate::rewrite::{CatchRewriter, FileFix, RewriteError};
use crate::safety::{RootGuard, SafetyError};
use crate::walk;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Compute rewrites without writing anything
    pub dry_run: bool,
}

/// What happened to one visited file.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// At least one catch was rewritten (or would be, in a dry run)
    Fixed(FileFix),
    /// Nothing to rewrite
    Unchanged { path: PathBuf },
    /// The guard refused the file
    Skipped { path: PathBuf, reason: String },
    /// Reading, rewriting or writing failed; the file is untouched
    Failed { path: PathBuf, reason: String },
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Fixed(fix) => write!(
                f,
                "Fixed {} empty catch blocks in {}",
                fix.count(),
                fix.path.display()
            ),
            FileOutcome::Unchanged { path } => write!(f, "Unchanged {}", path.display()),
            FileOutcome::Skipped { path, reason } => {
                write!(f, "Skipped {}: {}", path.display(), reason)
            }
            FileOutcome::Failed { path, reason } => {
                write!(f, "Error processing {}: {}", path.display(), reason)
            }
        }
    }
}

/// Totals accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub replacements: usize,
    pub files_failed: usize,
    pub files_skipped: usize,
    pub missing_directories: Vec<PathBuf>,
    pub dry_run: bool,
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("root directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error(transparent)]
    Guard(#[from] SafetyError),

    #[error(transparent)]
    Rewriter(#[from] RewriteError),
}

/// Rewrite every target file under the configured root.
///
/// `on_file` sees each outcome as soon as the file is done, in walk order.
pub fn run<F>(
    config: &RewriteConfig,
    options: &RunOptions,
    mut on_file: F,
) -> Result<RunSummary, RunError>
where
    F: FnMut(&FileOutcome),
{
    let root = &config.target.root;
    if !root.is_dir() {
        return Err(RunError::RootNotFound(root.clone()));
    }

    let guard = RootGuard::new(root, &config.target.exclude)?;
    let rewriter = CatchRewriter::new(config)?;
    let discovery = walk::discover(&config.target, &guard);

    let mut summary = RunSummary {
        missing_directories: discovery.missing,
        dry_run: options.dry_run,
        ..RunSummary::default()
    };

    for (path, reason) in discovery.errors {
        summary.files_failed += 1;
        on_file(&FileOutcome::Failed { path, reason });
    }

    for (path, reason) in discovery.skipped {
        summary.files_skipped += 1;
        on_file(&FileOutcome::Skipped { path, reason });
    }

    for path in discovery.files {
        summary.files_scanned += 1;

        let outcome = match rewriter.fix_file(&path, options.dry_run) {
            Ok(fix) if fix.count() > 0 && fix.changed() => {
                summary.files_changed += 1;
                summary.replacements += fix.count();
                FileOutcome::Fixed(fix)
            }
            Ok(_) => FileOutcome::Unchanged { path },
            Err(e) => {
                summary.files_failed += 1;
                FileOutcome::Failed {
                    path,
                    reason: e.to_string(),
                }
            }
        };

        on_file(&outcome);
    }

    Ok(summary)
}
