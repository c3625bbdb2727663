use crate::cache;
use crate::config::Locator;
use crate::rewrite::errors::RewriteError;
use crate::rewrite::shape::CatchShape;
use regex::Regex;

/// One empty catch block found in a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchMatch {
    pub shape: CatchShape,
    /// Byte offset of `catch` (inclusive)
    pub byte_start: usize,
    /// Byte offset just past the closing brace (exclusive)
    pub byte_end: usize,
    /// Indentation the replacement block is emitted at
    pub indent: String,
    /// Matched text, used to verify the span before splicing
    pub text: String,
}

/// Find every occurrence of `shape` in `content`, in ascending offset order.
pub fn find_catches(content: &str, shape: CatchShape) -> Vec<CatchMatch> {
    shape
        .regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let indent = match shape {
                CatchShape::MultiLine => caps.get(1).map_or("", |m| m.as_str()),
                CatchShape::SingleLine => line_indent(content, whole.start()),
            };
            Some(CatchMatch {
                shape,
                byte_start: whole.start(),
                byte_end: whole.end(),
                indent: indent.to_string(),
                text: whole.as_str().to_string(),
            })
        })
        .collect()
}

/// Leading spaces and tabs of the line containing `offset`.
pub fn line_indent(content: &str, offset: usize) -> &str {
    let line_start = content[..offset].rfind('\n').map_or(0, |idx| idx + 1);
    let line = &content[line_start..offset];
    let width = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..width]
}

/// 1-based line number of `offset`.
pub fn line_number(content: &str, offset: usize) -> usize {
    content[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}

/// Recovers the name of the method enclosing a catch by searching a
/// bounded window backward for a declaration-like pattern.
///
/// Purely lexical: the last `[modifier] [static] Type Name(` in the window
/// wins, whatever it actually is.
#[derive(Debug, Clone)]
pub struct MethodLocator {
    declaration: Regex,
    lookback: usize,
    fallback_name: String,
    skip_names: Vec<String>,
}

impl MethodLocator {
    pub fn new(config: &Locator) -> Result<Self, RewriteError> {
        let pattern = declaration_pattern(&config.modifiers);
        let declaration =
            cache::get_or_compile(&pattern).map_err(|source| RewriteError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;

        Ok(Self {
            declaration,
            lookback: config.lookback,
            fallback_name: config.fallback_name.clone(),
            skip_names: config.skip_names.clone(),
        })
    }

    /// Name of the nearest declaration before `offset`, or `None` when the
    /// window holds no usable candidate.
    pub fn find<'c>(&self, content: &'c str, offset: usize) -> Option<&'c str> {
        let before = &content[..offset];
        let window_start = before
            .char_indices()
            .rev()
            .nth(self.lookback.saturating_sub(1))
            .map_or(0, |(idx, _)| idx);
        let window = &before[window_start..];

        self.declaration
            .captures_iter(window)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .filter(|name| !self.skip_names.iter().any(|skip| skip == name))
            .last()
    }

    /// Like [`MethodLocator::find`], substituting the fallback name on a miss.
    pub fn enclosing_method<'a>(&'a self, content: &'a str, offset: usize) -> &'a str {
        self.find(content, offset).unwrap_or(&self.fallback_name)
    }

    pub fn fallback_name(&self) -> &str {
        &self.fallback_name
    }
}

fn declaration_pattern(modifiers: &[String]) -> String {
    let modifiers = modifiers
        .iter()
        .map(|m| regex::escape(m))
        .collect::<Vec<_>>()
        .join("|");

    if modifiers.is_empty() {
        r"(?:static)?\s*\w+\s+(\w+)\s*\(".to_string()
    } else {
        format!(r"(?:{modifiers})?\s*(?:static)?\s*\w+\s+(\w+)\s*\(")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator() -> MethodLocator {
        MethodLocator::new(&Locator::default()).unwrap()
    }

    #[test]
    fn test_find_single_line_catches_in_order() {
        let content = "a(); try { x(); } catch { }\n    try { y(); } catch {}\n";
        let matches = find_catches(content, CatchShape::SingleLine);
        assert_eq!(matches.len(), 2);
        assert!(matches[0].byte_start < matches[1].byte_start);
        assert_eq!(matches[0].text, "catch { }");
        assert_eq!(matches[0].indent, "");
        assert_eq!(matches[1].text, "catch {}");
        assert_eq!(matches[1].indent, "    ");
    }

    #[test]
    fn test_find_multi_line_catch() {
        let content = "        try\n        {\n        }\n        catch\n        {\n        }\n";
        let matches = find_catches(content, CatchShape::MultiLine);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].indent, "        ");
        assert!(matches[0].text.starts_with("catch"));
        assert!(matches[0].text.ends_with('}'));
    }

    #[test]
    fn test_line_helpers() {
        let content = "first\n\t  second catch";
        let offset = content.find("catch").unwrap();
        assert_eq!(line_indent(content, offset), "\t  ");
        assert_eq!(line_number(content, offset), 2);
        assert_eq!(line_number(content, 0), 1);
    }

    #[test]
    fn test_recovers_method_name() {
        let content = "void Foo() { try { Bar(); } catch { } }";
        let offset = content.find("catch").unwrap();
        assert_eq!(locator().enclosing_method(content, offset), "Foo");
    }

    #[test]
    fn test_modifiers_and_static() {
        let content = "    private static bool TryConnect(string host)\n    {\n        try { Open(host); } catch { }";
        let offset = content.find("catch").unwrap();
        assert_eq!(locator().enclosing_method(content, offset), "TryConnect");
    }

    #[test]
    fn test_last_declaration_in_window_wins() {
        let content = "public void First() { }\npublic void Second() { try { } catch { } }";
        let offset = content.find("catch").unwrap();
        assert_eq!(locator().enclosing_method(content, offset), "Second");
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        let content = "{ try { x = 1; } catch { } }";
        let offset = content.find("catch").unwrap();
        let locator = locator();
        assert_eq!(locator.find(content, offset), None);
        assert_eq!(locator.enclosing_method(content, offset), "unknown_method");
    }

    #[test]
    fn test_declaration_outside_window_is_ignored() {
        let padding = "x = 1;\n".repeat(60);
        let content = format!("void Far() {{\n{padding}try {{ }} catch {{ }}");
        let offset = content.find("catch").unwrap();
        assert_eq!(locator().enclosing_method(&content, offset), "unknown_method");
    }

    #[test]
    fn test_window_counts_characters() {
        let config = Locator {
            lookback: 4,
            ..Locator::default()
        };
        let locator = MethodLocator::new(&config).unwrap();
        let content = "ééééé catch";
        let offset = content.find("catch").unwrap();
        assert_eq!(locator.enclosing_method(content, offset), "unknown_method");
    }

    #[test]
    fn test_multi_byte_text_does_not_shrink_window() {
        // 175 characters but 325 bytes between the declaration and the catch
        let comment = "é".repeat(150);
        let content = format!("void Foo() {{\n// {comment}\ntry {{ }} catch {{ }} }}");
        let offset = content.find("catch").unwrap();
        assert!(offset > 300);
        assert_eq!(locator().enclosing_method(&content, offset), "Foo");
    }

    #[test]
    fn test_window_boundary_in_characters() {
        // "a Ü(é) " is 7 characters but 9 bytes
        let content = "a Ü(é) catch";
        let offset = content.find("catch").unwrap();

        let at = |lookback| {
            let config = Locator {
                lookback,
                ..Locator::default()
            };
            MethodLocator::new(&config).unwrap().find(content, offset)
        };

        assert_eq!(at(7), Some("Ü"));
        assert_eq!(at(6), None);
    }

    #[test]
    fn test_locators_share_compiled_declaration() {
        cache::clear_cache();
        let _first = locator();
        let _second = locator();
        assert_eq!(cache::cache_size(), 1);
    }

    #[test]
    fn test_skip_names() {
        let config = Locator {
            skip_names: vec!["if".to_string()],
            ..Locator::default()
        };
        let content = "void Run() { if (a) { } else if (b) { try { } catch { } } }";
        let offset = content.find("catch").unwrap();

        assert_eq!(locator().enclosing_method(content, offset), "if");
        let locator = MethodLocator::new(&config).unwrap();
        assert_eq!(locator.enclosing_method(content, offset), "Run");
    }
}
