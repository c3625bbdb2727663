//! catchfix: lexical rewriter for empty catch blocks
//!
//! Walks a source tree, finds empty `catch` blocks with two fixed regular
//! expressions, and replaces each one with a call to an error handler that
//! names the enclosing method.
//!
//! # Architecture
//!
//! All rewrites compile down to a single primitive: [`Edit`], a verified
//! byte-span replacement. Matches are collected first and spliced
//! highest-offset-first so pending offsets stay valid.
//!
//! The matching is purely lexical. There is no parser, and the output is
//! never checked for syntactic validity.
//!
//! # Safety
//!
//! - All edits verify expected before-text before applying
//! - Atomic file writes (tempfile + fsync + rename)
//! - Root boundary enforcement, including symlinks
//! - Files that are not valid UTF-8 are never touched
//! - A second run over rewritten files finds nothing
//!
//! # Example
//!
//! ```
//! use catchfix::{CatchRewriter, RewriteConfig};
//! use std::path::Path;
//!
//! let rewriter = CatchRewriter::new(&RewriteConfig::default()).unwrap();
//! let result = rewriter
//!     .rewrite_source(Path::new("Form1.cs"), "void Foo() { try { Bar(); } catch { } }")
//!     .unwrap();
//!
//! assert_eq!(result.count(), 1);
//! assert!(result.content.contains("\"Foo failed\""));
//! ```

pub mod cache;
pub mod config;
pub mod edit;
pub mod rewrite;
pub mod run;
pub mod safety;
pub mod walk;

// Re-exports
pub use config::{
    discover as discover_config, load_from_path, load_from_str, ConfigError, RewriteConfig,
};
pub use edit::{Edit, EditError, EditVerification};
pub use rewrite::{AppliedFix, CatchRewriter, CatchShape, FileFix, Rewrite, RewriteError};
pub use run::{run, FileOutcome, RunError, RunOptions, RunSummary};
pub use safety::{RootGuard, SafetyError};
