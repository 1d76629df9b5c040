//! Output formatters for CLI commands.
//!
//! Provides consistent formatting across all CLI commands for JSON, text, and pretty output modes.

use anyhow::Result;
use serde::Serialize;
use svcgen_core::cli::OutputFormat;

/// Format data according to the specified output format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use serde::Serialize;
/// use svcgen_cli::formatters::format_output;
/// use svcgen_core::cli::OutputFormat;
///
/// #[derive(Serialize)]
/// struct Summary {
///     service: String,
///     artifacts: usize,
/// }
///
/// let summary = Summary { service: "UserService".to_string(), artifacts: 2 };
///
/// let output = format_output(&summary, OutputFormat::Json)?;
/// assert!(output.contains("\"service\""));
///
/// let output = format_output(&summary, OutputFormat::Pretty)?;
/// assert_eq!(output, "artifacts: 2\nservice: UserService");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as JSON.
    ///
    /// Uses pretty-printing with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let json = serde_json::to_string_pretty(data)?;
        Ok(json)
    }

    /// Format data as compact JSON (no formatting).
    pub fn format_compact<T: Serialize>(data: &T) -> Result<String> {
        let json = serde_json::to_string(data)?;
        Ok(json)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize, json};

    /// Format data as plain text.
    ///
    /// Single-line JSON, suitable for piping to other commands or scripts.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        json::format_compact(data)
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Result, Serialize};
    use serde_json::Value;

    /// Format data as an indented outline.
    ///
    /// Objects become `key: value` lines sorted by key, arrays become
    /// `- item` lines, and null fields are omitted.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        format_value(&value, 0, &mut lines);
        Ok(lines.join("\n"))
    }

    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::Null => Some("null".to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Array(a) if a.is_empty() => Some("[]".to_string()),
            Value::Object(o) if o.is_empty() => Some("{}".to_string()),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn format_value(value: &Value, indent: usize, lines: &mut Vec<String>) {
        let pad = "  ".repeat(indent);
        match value {
            Value::Object(map) => {
                for (key, item) in map {
                    if item.is_null() {
                        continue;
                    }
                    if let Some(s) = scalar(item) {
                        lines.push(format!("{pad}{key}: {s}"));
                    } else {
                        lines.push(format!("{pad}{key}:"));
                        format_value(item, indent + 1, lines);
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    if let Some(s) = scalar(item) {
                        lines.push(format!("{pad}- {s}"));
                    } else {
                        lines.push(format!("{pad}-"));
                        format_value(item, indent + 1, lines);
                    }
                }
            }
            other => {
                if let Some(s) = scalar(other) {
                    lines.push(format!("{pad}{s}"));
                }
            }
        }
    }
}
