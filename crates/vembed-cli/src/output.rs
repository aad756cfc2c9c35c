//! Output formatting for CLI

use serde::Serialize;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// Render a record as `key: value` lines or pretty JSON
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> String {
    let value = serde_json::to_value(data).unwrap_or_default();
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Text => match value {
            serde_json::Value::Object(map) => map
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| match v {
                    serde_json::Value::String(s) => format!("{k}: {s}"),
                    other => format!("{k}: {other}"),
                })
                .collect::<Vec<_>>()
                .join("\n"),
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        },
    }
}
