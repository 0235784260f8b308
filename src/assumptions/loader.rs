//! CSV-based mortality table loader
//!
//! Expected layout: a header line, one sub-header line that is skipped, then
//! one row per age with the age in the first column and qx in the third
//! (typically `Age,lx,qx`). Rows whose age or qx is not numeric, or whose age
//! is negative or does not fit a `u32`, are dropped.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::mortality::MortalityTable;
use crate::error::{LoanCoverError, LoanCoverResult};

/// Default location of the mortality table
pub const DEFAULT_MORTALITY_TABLE_PATH: &str = "data/mortality_table.csv";

/// Environment variable overriding the table location
pub const MORTALITY_TABLE_ENV: &str = "LOAN_COVER_MORTALITY_TABLE";

const AGE_COLUMN: usize = 0;
const QX_COLUMN: usize = 2;

/// Pick the table path: explicit argument, then environment, then default
pub fn resolve_table_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var(MORTALITY_TABLE_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_MORTALITY_TABLE_PATH),
    }
}

/// Load and validate a mortality table from a CSV file
pub fn load_mortality_table<P: AsRef<Path>>(path: P) -> LoanCoverResult<MortalityTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoanCoverError::SourceData(format!(
            "mortality table not found, expected at {}",
            path.display()
        )));
    }

    let file = File::open(path).map_err(|e| {
        LoanCoverError::SourceData(format!("cannot open {}: {}", path.display(), e))
    })?;

    let table = load_mortality_table_from_reader(file)?;
    info!(
        "Loaded mortality table from {} ({} ages, terminal age {})",
        path.display(),
        table.len(),
        table.terminal_age()
    );
    Ok(table)
}

/// Load a mortality table from any reader (file, string buffer, request body)
pub fn load_mortality_table_from_reader<R: Read>(reader: R) -> LoanCoverResult<MortalityTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let column_count = csv_reader
        .headers()
        .map_err(|e| LoanCoverError::SourceData(format!("unreadable header: {}", e)))?
        .len();
    if column_count <= QX_COLUMN {
        return Err(LoanCoverError::SourceData(format!(
            "unexpected format: {} columns, need at least {}",
            column_count,
            QX_COLUMN + 1
        )));
    }

    let mut rates = BTreeMap::new();
    let mut dropped = 0usize;

    // First record after the header is a sub-header
    for result in csv_reader.records().skip(1) {
        let record = result.map_err(|e| LoanCoverError::SourceData(format!("malformed row: {}", e)))?;

        let age = record.get(AGE_COLUMN).and_then(parse_number);
        let qx = record.get(QX_COLUMN).and_then(parse_number);

        match (age, qx) {
            (Some(age), Some(qx)) if (0.0..=u32::MAX as f64).contains(&age) => {
                rates.insert(age.trunc() as u32, qx);
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!("Dropped {} mortality rows without a usable age and qx", dropped);
    }
    debug!("Parsed {} mortality rows", rates.len());

    MortalityTable::new(rates)
}

fn parse_number(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}
