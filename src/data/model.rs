use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FieldValue – a single cell / field of a row record
// ---------------------------------------------------------------------------

/// A dynamically-typed field value.
///
/// The delimited-text parser only ever produces `Text` and `Number`; the
/// remaining variants arise from JSON uploads and from arbitrary records
/// handed to the filter engine by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Object-valued field; the deep text search descends into these.
    Nested(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Whether the value counts as "present" for text matching.
    /// Empty text, zero, NaN, `false` and null do not; nested objects
    /// always do, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Nested(_) => true,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Nested(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one data row
// ---------------------------------------------------------------------------

/// One row as a field-name → value mapping. Header order is kept separately
/// in [`ParsedTable::headers`]; the record itself is lookup-only.
pub type Record = BTreeMap<String, FieldValue>;

// ---------------------------------------------------------------------------
// ParsedTable / TableData – parser output containers
// ---------------------------------------------------------------------------

/// Raw parse result of one delimited file: column names in header order
/// (post-trim, duplicates kept) and the typed rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
}

/// One upload's rows wrapped under a mapping keyed by the table name, the
/// shape the instance model merges from.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub table_name: String,
    pub data: BTreeMap<String, Vec<Record>>,
}

impl TableData {
    /// Wrap a row sequence under its table name.
    pub fn new(table_name: impl Into<String>, rows: Vec<Record>) -> Self {
        let table_name = table_name.into();
        let mut data = BTreeMap::new();
        data.insert(table_name.clone(), rows);
        TableData { table_name, data }
    }

    /// The rows of the named table.
    pub fn rows(&self) -> &[Record] {
        self.data
            .get(&self.table_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total row count.
    pub fn len(&self) -> usize {
        self.rows().len()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }
}
