use crate::constants::{csv_column, CSV_COLUMNS};
use crate::error::{Error, Result};
use crate::models::{Observation, ObservationCatalog, ObservationSeries};
use crate::services::repository::insert_sorted;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, warn};

/// Strip thousands separators, quoting and stray spaces before parsing
fn clean_numeric(raw: &str) -> String {
    raw.replace(',', "").replace('"', "").replace(' ', "")
}

/// Parse a decimal token leniently; anything unparseable is "no value",
/// so one malformed field never discards an otherwise-valid record.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned = clean_numeric(raw);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Parse an integer token leniently; anything unparseable is "no value".
pub fn parse_integer(raw: &str) -> Option<u64> {
    let cleaned = clean_numeric(raw);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

fn parse_row_date(raw: &str) -> Result<NaiveDate> {
    crate::utils::parse_date(raw)
        .map_err(|e| Error::Parse(format!("invalid date '{}': {}", raw, e)))
}

/// Load one company CSV file into a date-sorted observation series.
///
/// The header row is skipped. A row without a parseable date has no key
/// and is skipped with a warning; the rest of the file still loads. A
/// duplicate date overwrites the earlier row.
pub fn load_company_csv(path: &Path) -> Result<ObservationSeries> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut series = ObservationSeries::new();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable row");
                continue;
            }
        };
        if record.len() != CSV_COLUMNS {
            debug!(
                path = %path.display(),
                columns = record.len(),
                expected = CSV_COLUMNS,
                "Ragged CSV row"
            );
        }

        let raw_date = record.get(csv_column::DATE).unwrap_or("");
        let date = match parse_row_date(raw_date) {
            Ok(date) => date,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping row");
                continue;
            }
        };

        let observation = Observation::new(
            date,
            parse_decimal(record.get(csv_column::LAST_TRADE_PRICE).unwrap_or("")),
            parse_decimal(record.get(csv_column::MAX).unwrap_or("")),
            parse_decimal(record.get(csv_column::MIN).unwrap_or("")),
            parse_decimal(record.get(csv_column::AVG_PRICE).unwrap_or("")),
            parse_decimal(record.get(csv_column::CHG).unwrap_or("")),
            parse_integer(record.get(csv_column::VOLUME).unwrap_or("")),
            parse_integer(record.get(csv_column::TURNOVER_BEST_MKD).unwrap_or("")),
            parse_integer(record.get(csv_column::TOTAL_TURNOVER_MKD).unwrap_or("")),
        );
        insert_sorted(&mut series, observation);
    }

    Ok(series)
}

/// Load every `<COMPANY>.csv` in a directory into a catalog keyed by
/// company name (the file stem). A company whose file fails to load is
/// skipped with a warning; a missing directory is an error.
pub fn load_directory(dir: &Path) -> Result<ObservationCatalog> {
    let mut catalog = ObservationCatalog::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let Some(company) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        match load_company_csv(&path) {
            Ok(series) => {
                debug!(company, records = series.len(), "Loaded company file");
                catalog.insert(company.to_string(), series);
            }
            Err(e) => {
                warn!(company, error = %e, "Skipping unreadable company file");
            }
        }
    }

    Ok(catalog)
}
