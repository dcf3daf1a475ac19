// dump.rs - Output-only formats for arbitrary query results

use super::traits::DumpFormat;
use crate::error::{ConvertError, Result};
use serde_json::Value;
use std::io::Write;

/// Plain text: strings are written raw, everything else as compact JSON.
/// Arrays produce one line per element.
#[derive(Debug, Clone)]
pub struct TextFormat;

impl TextFormat {
    fn write_line(value: &Value, output: &mut dyn Write) -> std::io::Result<()> {
        match value {
            Value::String(s) => writeln!(output, "{}", s),
            other => writeln!(output, "{}", other),
        }
    }
}

impl DumpFormat for TextFormat {
    fn name(&self) -> &'static str {
        "txt"
    }

    fn description(&self) -> &'static str {
        "Plain text, one value per line"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["text"]
    }

    fn dump(&self, value: &Value, output: &mut dyn Write) -> Result<()> {
        let written = match value {
            Value::Array(items) => items
                .iter()
                .try_for_each(|item| Self::write_line(item, output)),
            other => Self::write_line(other, output),
        };
        written.map_err(|e| ConvertError::write(self.name(), e))
    }
}

#[derive(Debug, Clone)]
pub struct JsonFormat;

impl DumpFormat for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn description(&self) -> &'static str {
        "Pretty printed JSON"
    }

    fn dump(&self, value: &Value, output: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *output, value)
            .map_err(|e| ConvertError::write(self.name(), e))?;
        writeln!(output).map_err(|e| ConvertError::write(self.name(), e))
    }
}

#[derive(Debug, Clone)]
pub struct YamlFormat;

impl DumpFormat for YamlFormat {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn description(&self) -> &'static str {
        "YAML document"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["yml"]
    }

    fn dump(&self, value: &Value, output: &mut dyn Write) -> Result<()> {
        serde_yaml::to_writer(&mut *output, value).map_err(|e| ConvertError::write(self.name(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dump_to_string(format: &dyn DumpFormat, value: &Value) -> String {
        let mut out = Vec::new();
        format.dump(value, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_array_lines() {
        let value = json!(["NC_000913.3", 42, {"a": 1}]);
        assert_eq!(
            dump_to_string(&TextFormat, &value),
            "NC_000913.3\n42\n{\"a\":1}\n"
        );
    }

    #[test]
    fn test_text_scalar() {
        assert_eq!(dump_to_string(&TextFormat, &json!("plasmid")), "plasmid\n");
    }

    #[test]
    fn test_json_pretty() {
        let text = dump_to_string(&JsonFormat, &json!({"id": "x"}));
        assert_eq!(text, "{\n  \"id\": \"x\"\n}\n");
    }

    #[test]
    fn test_yaml() {
        let text = dump_to_string(&YamlFormat, &json!({"id": "x", "len": 3}));
        let back: Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, json!({"id": "x", "len": 3}));
    }
}
