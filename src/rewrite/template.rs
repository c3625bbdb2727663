use crate::config::Handler;

/// Line terminator used for emitted lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// CRLF if the buffer contains any CRLF, LF otherwise.
    pub fn detect(content: &str) -> Self {
        if content.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Renders the handler block that replaces an empty catch.
///
/// ```text
/// catch (Exception ex)
/// <indent>{
/// <indent>    ErrorHandler.HandleNonCritical(() => { }, ex, "Name failed");
/// <indent>}
/// ```
///
/// The first line continues wherever `catch` stood, so it carries no indent.
#[derive(Debug, Clone)]
pub struct HandlerTemplate {
    exception_type: String,
    binding: String,
    call: String,
    message_suffix: String,
    indent_unit: String,
}

impl HandlerTemplate {
    pub fn new(handler: &Handler) -> Self {
        Self {
            exception_type: handler.exception_type.trim().to_string(),
            binding: handler.binding.clone(),
            call: handler.call.trim().to_string(),
            message_suffix: handler.message_suffix.trim().to_string(),
            indent_unit: handler.indent_unit.clone(),
        }
    }

    /// Message passed to the handler for `method`.
    pub fn message(&self, method: &str) -> String {
        if self.message_suffix.is_empty() {
            method.to_string()
        } else {
            format!("{method} {}", self.message_suffix)
        }
    }

    pub fn render(&self, method: &str, indent: &str, eol: LineEnding) -> String {
        let eol = eol.as_str();
        let binding = &self.binding;
        format!(
            "catch ({exception} {binding}){eol}\
             {indent}{{{eol}\
             {indent}{unit}{call}(() => {{ }}, {binding}, \"{message}\");{eol}\
             {indent}}}",
            exception = self.exception_type,
            unit = self.indent_unit,
            call = self.call,
            message = self.message(method),
        )
    }
}
