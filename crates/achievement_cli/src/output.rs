//! Rendering of command results

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Render `value` as JSON, or as `label: value` lines for text output
pub fn render<T: Serialize>(format: OutputFormat, value: &T, lines: &[(&str, String)]) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => Ok(lines
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_text_and_json() {
        let value = json!({ "hash": "0x1" });
        let lines = [("Hash", "0x1".to_string())];

        assert_eq!(render(OutputFormat::Text, &value, &lines).unwrap(), "Hash: 0x1");

        let rendered = render(OutputFormat::Json, &value, &lines).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, value);
    }
}
