use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tabsift::config::Config;
use tabsift::data::filter::{filter_records, Criterion};
use tabsift::data::loader::load_file;

/// Load an upload, apply search and filter criteria, print matching rows.
#[derive(Parser)]
#[command(name = "tabsift", version, about)]
struct Args {
    /// Upload file (.csv, .tsv or .json)
    path: PathBuf,

    /// Case-insensitive text searched across all fields
    #[arg(long)]
    search: Option<String>,

    /// JSON file holding an array of filter criteria
    #[arg(long)]
    criteria: Option<PathBuf>,

    /// Field excluded from the text search (repeatable)
    #[arg(long = "ignore", value_name = "FIELD")]
    ignored: Vec<String>,

    /// Config document with filename-prefix → handler routes
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config '{}'", path.display()))?;
            Config::from_json(&text)?
        }
        None => Config::default(),
    };

    let criteria: Vec<Criterion> = match &args.criteria {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading criteria '{}'", path.display()))?;
            serde_json::from_str(&text).context("parsing criteria")?
        }
        None => Vec::new(),
    };

    let table = load_file(&args.path, &config)?;

    for (name, rows) in &table.data {
        // Without a search or criteria the engine is bypassed, so rows whose
        // fields are all falsy still print.
        let visible = if args.search.is_none() && criteria.is_empty() {
            rows.clone()
        } else {
            let ignored: BTreeSet<String> = args.ignored.iter().cloned().collect();
            filter_records(
                rows,
                args.search.as_deref().unwrap_or(""),
                &criteria,
                &ignored,
            )
        };

        log::info!("table '{name}': {} of {} rows match", visible.len(), rows.len());
        for row in &visible {
            println!("{}", serde_json::to_string(row)?);
        }
    }

    Ok(())
}
