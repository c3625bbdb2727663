use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// `catch {}` / `catch { }` with only horizontal whitespace around the braces.
const SINGLE_LINE_PATTERN: &str = r"\bcatch[ \t]*\{[ \t]*\}";

/// `catch`, then a line holding only `{`, then a line holding only `}`.
/// Group 1 is the indentation of the `{` line.
const MULTI_LINE_PATTERN: &str = r"\bcatch[ \t]*\r?\n([ \t]*)\{[ \t]*\r?\n[ \t]*\}";

/// The two textual shapes of an empty catch block the rewriter recognizes.
///
/// Anything else (typed catches, comments inside the braces, blank lines
/// between them) is deliberately left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatchShape {
    SingleLine,
    MultiLine,
}

impl CatchShape {
    /// Shapes in the order their passes run.
    pub const ALL: [CatchShape; 2] = [CatchShape::SingleLine, CatchShape::MultiLine];

    pub fn regex(self) -> &'static Regex {
        static SINGLE: OnceLock<Regex> = OnceLock::new();
        static MULTI: OnceLock<Regex> = OnceLock::new();

        match self {
            CatchShape::SingleLine => SINGLE.get_or_init(|| {
                Regex::new(SINGLE_LINE_PATTERN).expect("single-line catch pattern is valid")
            }),
            CatchShape::MultiLine => MULTI.get_or_init(|| {
                Regex::new(MULTI_LINE_PATTERN).expect("multi-line catch pattern is valid")
            }),
        }
    }
}

impl fmt::Display for CatchShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatchShape::SingleLine => write!(f, "single-line"),
            CatchShape::MultiLine => write!(f, "multi-line"),
        }
    }
}
