use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::csv::{extract_table_name, parse_csv_to_data};
use super::model::{FieldValue, Record, TableData};
use crate::config::{Config, ProcessorKind};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an upload from disk and run it through the resolved processor.
///
/// Handler resolution order: the config's filename-prefix table first, then
/// the file extension (`.csv`/`.tsv` → delimited, `.json` → JSON).
pub fn load_file(path: &Path, config: &Config) -> Result<TableData> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let kind = match config
        .resolve_processor(filename)
        .or_else(|| kind_for_extension(filename))
    {
        Some(kind) => kind,
        None => bail!("no processor registered for '{filename}'"),
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading upload '{}'", path.display()))?;

    let table = match kind {
        ProcessorKind::Delimited => parse_csv_to_data(&text, filename),
        ProcessorKind::Json => parse_json_to_data(&text, filename)?,
    };

    log::info!(
        "loaded table '{}' with {} rows from '{filename}'",
        table.table_name,
        table.len()
    );
    Ok(table)
}

fn kind_for_extension(filename: &str) -> Option<ProcessorKind> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" | "tsv" => Some(ProcessorKind::Delimited),
        "json" => Some(ProcessorKind::Json),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// JSON ingestion
// ---------------------------------------------------------------------------

/// Records-oriented JSON upload:
///
/// ```json
/// [
///   { "node": "A", "demand": 10, "window": { "from": "08:00" } },
///   ...
/// ]
/// ```
///
/// One record per array element; object-valued fields become nested values.
pub fn parse_json_to_data(text: &str, filename: &str) -> Result<TableData> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut row = Record::new();
        for (key, val) in obj {
            row.insert(key.clone(), json_to_field(val));
        }
        rows.push(row);
    }

    Ok(TableData::new(extract_table_name(filename), rows))
}

fn json_to_field(val: &JsonValue) -> FieldValue {
    match val {
        JsonValue::Null => FieldValue::Null,
        JsonValue::Bool(b) => FieldValue::Bool(*b),
        JsonValue::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(f64::NAN)),
        JsonValue::String(s) => FieldValue::Text(s.clone()),
        JsonValue::Object(map) => FieldValue::Nested(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_field(v)))
                .collect(),
        ),
        other => FieldValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_records() {
        let text = r#"[
            { "node": "A", "demand": 10, "priority": true },
            { "node": "B", "demand": 4.5, "note": null }
        ]"#;
        let table = parse_json_to_data(text, "nodes.json").unwrap();
        assert_eq!(table.table_name, "nodes");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0]["demand"], FieldValue::Number(10.0));
        assert_eq!(table.rows()[0]["priority"], FieldValue::Bool(true));
        assert_eq!(table.rows()[1]["note"], FieldValue::Null);
    }

    #[test]
    fn test_parse_json_nested_objects() {
        let text = r#"[{ "node": "A", "window": { "from": "08:00", "to": "12:00" } }]"#;
        let table = parse_json_to_data(text, "nodes.json").unwrap();
        match &table.rows()[0]["window"] {
            FieldValue::Nested(map) => {
                assert_eq!(map["from"], FieldValue::Text("08:00".into()));
            }
            other => panic!("expected nested value, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_json_rejects_non_array_roots() {
        assert!(parse_json_to_data(r#"{"a": 1}"#, "x.json").is_err());
        let err = parse_json_to_data(r#"[1, 2]"#, "x.json").unwrap_err();
        assert!(err.to_string().contains("Row 0"));
    }

    #[test]
    fn test_extension_dispatch() {
        assert_eq!(kind_for_extension("a.csv"), Some(ProcessorKind::Delimited));
        assert_eq!(kind_for_extension("a.TSV"), Some(ProcessorKind::Delimited));
        assert_eq!(kind_for_extension("a.json"), Some(ProcessorKind::Json));
        assert_eq!(kind_for_extension("a.yaml"), None);
        assert_eq!(kind_for_extension("noext"), None);
    }
}
