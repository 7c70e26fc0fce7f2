//! Typed table ingestion and record filtering for optimization instance
//! uploads: a delimiter-detecting CSV parser, a records-oriented JSON
//! loader, and a multi-criteria filter engine for dashboard and list views.

pub mod config;
pub mod data;
