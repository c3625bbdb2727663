use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Full rewriter configuration. Every field has a default, so an empty
/// TOML document (or no file at all) reproduces the built-in layout.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteConfig {
    pub target: Target,
    pub handler: Handler,
    pub locator: Locator,
}

impl RewriteConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.target.directories.is_empty() {
            issues.push(ValidationIssue::EmptyList {
                field: "target.directories",
            });
        }
        for dir in &self.target.directories {
            if dir.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    field: "target.directories[]",
                });
            }
        }
        if self.target.extension().is_empty() {
            issues.push(ValidationIssue::MissingField {
                field: "target.extension",
            });
        }

        if self.handler.exception_type.trim().is_empty() {
            issues.push(ValidationIssue::MissingField {
                field: "handler.exception_type",
            });
        }
        if self.handler.call.trim().is_empty() {
            issues.push(ValidationIssue::MissingField {
                field: "handler.call",
            });
        }
        if !is_identifier(&self.handler.binding) {
            issues.push(ValidationIssue::NotIdentifier {
                field: "handler.binding",
                value: self.handler.binding.clone(),
            });
        }
        if !self
            .handler
            .indent_unit
            .chars()
            .all(|c| c == ' ' || c == '\t')
        {
            issues.push(ValidationIssue::Invalid {
                field: "handler.indent_unit",
                message: "may only contain spaces and tabs".to_string(),
            });
        }

        if self.locator.lookback == 0 {
            issues.push(ValidationIssue::Invalid {
                field: "locator.lookback",
                message: "must be greater than zero".to_string(),
            });
        }
        if !is_identifier(&self.locator.fallback_name) {
            issues.push(ValidationIssue::NotIdentifier {
                field: "locator.fallback_name",
                value: self.locator.fallback_name.clone(),
            });
        }
        for modifier in &self.locator.modifiers {
            if !is_identifier(modifier) {
                issues.push(ValidationIssue::NotIdentifier {
                    field: "locator.modifiers[]",
                    value: modifier.clone(),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

/// Where to look for files.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Target {
    pub root: PathBuf,
    /// Subdirectories of `root` to recurse into; missing ones are skipped
    pub directories: Vec<String>,
    /// File extension without the leading dot (a leading dot is tolerated)
    pub extension: String,
    /// Subdirectories of `root` that are never rewritten
    pub exclude: Vec<String>,
}

impl Target {
    pub fn extension(&self) -> &str {
        self.extension.trim().trim_start_matches('.')
    }
}

impl Default for Target {
    fn default() -> Self {
        Self {
            root: PathBuf::from("Server"),
            directories: vec![
                "Forms".to_string(),
                "Handle Packet".to_string(),
                "Helper".to_string(),
                "Connection".to_string(),
            ],
            extension: "cs".to_string(),
            exclude: vec!["bin".to_string(), "obj".to_string()],
        }
    }
}

/// Shape of the emitted handler block.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Handler {
    pub exception_type: String,
    pub binding: String,
    pub call: String,
    pub message_suffix: String,
    pub indent_unit: String,
}

impl Default for Handler {
    fn default() -> Self {
        Self {
            exception_type: "Exception".to_string(),
            binding: "ex".to_string(),
            call: "ErrorHandler.HandleNonCritical".to_string(),
            message_suffix: "failed".to_string(),
            indent_unit: "    ".to_string(),
        }
    }
}

/// Enclosing-method recovery.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Locator {
    /// Characters searched backward from the start of each catch
    pub lookback: usize,
    pub fallback_name: String,
    pub modifiers: Vec<String>,
    /// Identifiers never accepted as a method name
    pub skip_names: Vec<String>,
}

impl Default for Locator {
    fn default() -> Self {
        Self {
            lookback: 300,
            fallback_name: "unknown_method".to_string(),
            modifiers: vec![
                "public".to_string(),
                "private".to_string(),
                "protected".to_string(),
                "internal".to_string(),
            ],
            skip_names: Vec::new(),
        }
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyList {
        field: &'static str,
    },
    MissingField {
        field: &'static str,
    },
    NotIdentifier {
        field: &'static str,
        value: String,
    },
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyList { field } => write!(f, "'{field}' must not be empty"),
            ValidationIssue::MissingField { field } => {
                write!(f, "missing required field '{field}'")
            }
            ValidationIssue::NotIdentifier { field, value } => {
                write!(f, "'{field}' must be an identifier, got {value:?}")
            }
            ValidationIssue::Invalid { field, message } => write!(f, "'{field}' {message}"),
        }
    }
}
