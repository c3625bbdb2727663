//! Lexical empty-catch rewriting.
//!
//! Each [`CatchShape`] gets its own pass over the buffer. A pass collects
//! every match first, turns each into a verified [`Edit`], and splices them
//! highest-offset-first; the next pass then scans the already-mutated
//! buffer. Nothing here parses the target language.

pub mod errors;
pub mod locator;
pub mod shape;
pub mod template;

pub use errors::RewriteError;
pub use locator::{find_catches, line_number, CatchMatch, MethodLocator};
pub use shape::CatchShape;
pub use template::{HandlerTemplate, LineEnding};

use crate::config::RewriteConfig;
use crate::edit::{self, Edit};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One replaced catch block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedFix {
    pub shape: CatchShape,
    /// 1-based line of the `catch` keyword in the original text
    pub line: usize,
    pub method: String,
    /// True when no declaration was found and the fallback name was used
    pub used_fallback: bool,
}

/// Result of rewriting one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    /// Fixes ordered by line
    pub fixes: Vec<AppliedFix>,
}

impl Rewrite {
    pub fn count(&self) -> usize {
        self.fixes.len()
    }
}

/// Outcome of [`CatchRewriter::fix_file`] for a file that could be read.
#[derive(Debug, Clone)]
pub struct FileFix {
    pub path: PathBuf,
    pub fixes: Vec<AppliedFix>,
    pub original: String,
    pub rewritten: String,
    /// Whether the rewritten text was written back to disk
    pub written: bool,
}

impl FileFix {
    pub fn count(&self) -> usize {
        self.fixes.len()
    }

    pub fn changed(&self) -> bool {
        self.original != self.rewritten
    }
}

#[derive(Debug, Clone)]
pub struct CatchRewriter {
    locator: MethodLocator,
    template: HandlerTemplate,
}

impl CatchRewriter {
    pub fn new(config: &RewriteConfig) -> Result<Self, RewriteError> {
        Ok(Self {
            locator: MethodLocator::new(&config.locator)?,
            template: HandlerTemplate::new(&config.handler),
        })
    }

    /// Rewrite every empty catch in `content`.
    ///
    /// `file` only labels edit errors; nothing is read or written.
    pub fn rewrite_source(&self, file: &Path, content: &str) -> Result<Rewrite, RewriteError> {
        let eol = LineEnding::detect(content);
        let mut current = content.to_string();
        let mut offsets = OffsetMap::default();
        let mut fixes = Vec::new();

        for shape in CatchShape::ALL {
            let matches = find_catches(&current, shape);
            if matches.is_empty() {
                continue;
            }

            let mut edits = Vec::with_capacity(matches.len());
            let mut spans = Vec::with_capacity(matches.len());

            for m in &matches {
                let found = self.locator.find(&current, m.byte_start);
                let method = found.unwrap_or(self.locator.fallback_name());
                let replacement = self.template.render(method, &m.indent, eol);

                fixes.push(AppliedFix {
                    shape,
                    line: line_number(content, offsets.original(m.byte_start)),
                    method: method.to_string(),
                    used_fallback: found.is_none(),
                });
                spans.push(Span {
                    start: m.byte_start,
                    delta: replacement.len() as isize - m.text.len() as isize,
                });
                edits.push(Edit::new(
                    file,
                    m.byte_start,
                    m.byte_end,
                    replacement,
                    &m.text,
                ));
            }

            current = edit::splice(&current, edits)?;
            offsets.record(&spans);
        }

        fixes.sort_by_key(|fix| fix.line);

        Ok(Rewrite {
            content: current,
            fixes,
        })
    }

    /// Rewrite a file in place.
    ///
    /// Read and decode failures leave the file untouched. The file is only
    /// written when its content changed and `dry_run` is false.
    pub fn fix_file(&self, path: &Path, dry_run: bool) -> Result<FileFix, RewriteError> {
        let bytes = fs::read(path).map_err(|source| RewriteError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let original = String::from_utf8(bytes).map_err(|source| RewriteError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let rewrite = self.rewrite_source(path, &original)?;

        let changed = rewrite.content != original;
        if changed && !dry_run {
            edit::atomic_write(path, rewrite.content.as_bytes()).map_err(|source| {
                RewriteError::Write {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        }

        Ok(FileFix {
            path: path.to_path_buf(),
            fixes: rewrite.fixes,
            original,
            rewritten: rewrite.content,
            written: changed && !dry_run,
        })
    }
}

/// A spliced replacement: where it starts in the buffer it was applied to,
/// and how much longer (or shorter) it made that buffer.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    delta: isize,
}

/// Maps offsets in the current buffer back to the original text.
///
/// Later passes only match text that earlier passes left alone, so an
/// offset never falls inside a recorded replacement.
#[derive(Debug, Default)]
struct OffsetMap {
    /// Recorded replacements in current-buffer coordinates, ascending
    spans: Vec<Span>,
}

impl OffsetMap {
    fn original(&self, offset: usize) -> usize {
        let shift: isize = self
            .spans
            .iter()
            .take_while(|span| span.start < offset)
            .map(|span| span.delta)
            .sum();
        (offset as isize - shift) as usize
    }

    /// Record a pass's replacements (given in the pre-pass buffer,
    /// ascending) and move everything into post-pass coordinates.
    fn record(&mut self, applied: &[Span]) {
        let shift_before = |offset: usize| -> isize {
            applied
                .iter()
                .take_while(|span| span.start < offset)
                .map(|span| span.delta)
                .sum()
        };

        let mut spans: Vec<Span> = self
            .spans
            .iter()
            .map(|span| Span {
                start: (span.start as isize + shift_before(span.start)) as usize,
                delta: span.delta,
            })
            .collect();
        spans.extend(applied.iter().map(|span| Span {
            start: (span.start as isize + shift_before(span.start)) as usize,
            delta: span.delta,
        }));
        spans.sort_by_key(|span| span.start);

        self.spans = spans;
    }
}
