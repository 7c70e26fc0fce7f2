/// Data layer: value model, ingestion, and filtering.
///
/// Architecture:
/// ```text
///  upload (.csv / .json)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  resolve processor, parse file → TableData
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  TableData    │  table name → Vec<Record>
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  text search + criteria → matching records
///   └──────────┘
/// ```

pub mod csv;
pub mod filter;
pub mod loader;
pub mod model;
