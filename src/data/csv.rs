use super::model::{FieldValue, ParsedTable, Record, TableData};

// ---------------------------------------------------------------------------
// Delimiter detection
// ---------------------------------------------------------------------------

/// Separator candidates, in priority order. Ties fall back to the earliest.
const DELIMITER_CANDIDATES: [char; 3] = [',', ';', '\t'];

/// Pick the separator with the highest occurrence count in the first line.
/// Empty input falls back to a comma.
pub fn detect_delimiter(text: &str) -> char {
    let first_line = text.lines().next().unwrap_or("");

    let mut best = DELIMITER_CANDIDATES[0];
    let mut best_count = 0;
    for candidate in DELIMITER_CANDIDATES {
        let count = first_line.matches(candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Content parsing
// ---------------------------------------------------------------------------

/// Parse delimited text into headers and typed rows.
///
/// The first line that is non-empty after trimming is the header line; every
/// later non-blank line is a data line. Cells pair with headers positionally:
/// a short row simply lacks the trailing fields (no empty/null placeholders)
/// and excess trailing cells of a long row are dropped.
///
/// Quoting is minimal on purpose: at most one layer of matching straight
/// double or single quotes is peeled per cell. A delimiter inside quotes
/// still splits, and fields never span lines.
pub fn parse_csv_content(text: &str, delimiter: char) -> ParsedTable {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return ParsedTable::default();
    };
    let headers: Vec<String> = header_line
        .split(delimiter)
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for line in lines {
        let mut record = Record::new();
        for (header, cell) in headers.iter().zip(line.split(delimiter)) {
            record.insert(header.clone(), type_cell(cell));
        }
        rows.push(record);
    }

    ParsedTable { headers, rows }
}

/// Trim, peel one quote layer, then promote fully-numeric text to a number.
fn type_cell(raw: &str) -> FieldValue {
    let cell = strip_quotes(raw.trim());
    if is_numeric_literal(cell) {
        if let Ok(n) = cell.parse::<f64>() {
            return FieldValue::Number(n);
        }
    }
    FieldValue::Text(cell.to_string())
}

/// Remove a single matching pair of straight double or single quotes.
fn strip_quotes(cell: &str) -> &str {
    for quote in ['"', '\''] {
        if cell.len() >= 2 && cell.starts_with(quote) && cell.ends_with(quote) {
            return &cell[1..cell.len() - 1];
        }
    }
    cell
}

/// Optionally signed digits with an optional decimal part. No thousands
/// separators, no exponent; `123abc` and the empty string do not qualify.
fn is_numeric_literal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    if unsigned.is_empty() {
        return false;
    }
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        Some(frac) => !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit()),
        None => true,
    }
}

// ---------------------------------------------------------------------------
// Table naming / composition
// ---------------------------------------------------------------------------

/// The filename up to its first dot; unchanged when there is none.
pub fn extract_table_name(filename: &str) -> &str {
    filename.split('.').next().unwrap_or(filename)
}

/// Detect the separator, parse, and wrap the rows under the table name
/// derived from the filename. Malformed input degenerates to an empty table
/// rather than failing.
pub fn parse_csv_to_data(text: &str, filename: &str) -> TableData {
    let delimiter = detect_delimiter(text);
    let parsed = parse_csv_content(text, delimiter);
    TableData::new(extract_table_name(filename), parsed.rows)
}
