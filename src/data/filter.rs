use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::model::{FieldValue, Record};

// ---------------------------------------------------------------------------
// Criterion – one typed filter rule applied to a field
// ---------------------------------------------------------------------------

/// Comparison operator of a [`Criterion::Number`] rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberOp {
    Lt,
    Gt,
    Eq,
}

/// A typed filter rule. Records must satisfy every supplied criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Criterion {
    /// Field must be a boolean equal to `expected`.
    Boolean { field: String, expected: bool },
    /// Stringified field value must be one of `selected`.
    Category {
        field: String,
        selected: BTreeSet<String>,
    },
    /// Field compared numerically against `value`. `Eq` coerces: numeric
    /// text, booleans and null all map onto numbers before comparing.
    Number {
        field: String,
        op: NumberOp,
        value: f64,
    },
    /// Field interpreted as a date inside `[from, to]`, bounds inclusive.
    Date {
        field: String,
        from: NaiveDate,
        to: NaiveDate,
    },
    /// Catch-all for unrecognized rule tags; filters nothing.
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Select the records matching the text search AND every criterion.
///
/// The search is a case-insensitive substring test over the stringified
/// value of every top-level field not named in `ignored_fields`, descending
/// into nested object values. Falsy values (empty text, zero, `false`,
/// null) are skipped before the substring test runs, so a record with no
/// truthy non-ignored field never matches, not even for an empty search
/// term. Output keeps the input's relative order.
pub fn filter_records(
    records: &[Record],
    search: &str,
    criteria: &[Criterion],
    ignored_fields: &BTreeSet<String>,
) -> Vec<Record> {
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| matches_search(record, &needle, ignored_fields))
        .filter(|record| criteria.iter().all(|c| matches_criterion(record, c)))
        .cloned()
        .collect()
}

/// Any non-ignored field matching counts.
fn matches_search(record: &Record, needle: &str, ignored_fields: &BTreeSet<String>) -> bool {
    record
        .iter()
        .filter(|(field, _)| !ignored_fields.contains(field.as_str()))
        .any(|(_, value)| value_matches(value, needle))
}

fn value_matches(value: &FieldValue, needle: &str) -> bool {
    if !value.is_truthy() {
        return false;
    }
    match value {
        FieldValue::Nested(children) => children.values().any(|v| value_matches(v, needle)),
        scalar => scalar.to_string().to_lowercase().contains(needle),
    }
}

fn matches_criterion(record: &Record, criterion: &Criterion) -> bool {
    match criterion {
        Criterion::Boolean { field, expected } => {
            matches!(record.get(field), Some(FieldValue::Bool(b)) if b == expected)
        }
        Criterion::Category { field, selected } => {
            // Direct index: a record missing the field faults (known sharp
            // edge, pinned by a regression test).
            selected.contains(&record[field.as_str()].to_string())
        }
        Criterion::Number { field, op, value } => match record.get(field).and_then(as_number) {
            Some(actual) => match op {
                NumberOp::Lt => actual < *value,
                NumberOp::Gt => actual > *value,
                NumberOp::Eq => actual == *value,
            },
            None => false,
        },
        Criterion::Date { field, from, to } => match record.get(field).and_then(as_date) {
            Some(date) => *from <= date && date <= *to,
            None => false,
        },
        Criterion::Unknown => true,
    }
}

/// Numeric coercion for comparisons: booleans become 0/1, null and empty
/// text become 0, numeric text parses, everything else is incomparable.
fn as_number(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) => Some(*n),
        FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        FieldValue::Null => Some(0.0),
        FieldValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse().ok()
            }
        }
        FieldValue::Nested(_) => None,
    }
}

/// Date interpretation: numbers are epoch milliseconds, text is tried as
/// RFC 3339, then `Y-m-d H:M:S`, then a bare `Y-m-d`.
fn as_date(value: &FieldValue) -> Option<NaiveDate> {
    match value {
        FieldValue::Number(millis) => {
            DateTime::from_timestamp_millis(*millis as i64).map(|dt| dt.date_naive())
        }
        FieldValue::Text(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
