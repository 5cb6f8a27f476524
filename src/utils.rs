use chrono::NaiveDate;
use std::path::PathBuf;

use crate::constants::DATE_FORMAT;

/// Get the observation data directory from environment variable or use default
pub fn get_data_dir() -> PathBuf {
    std::env::var("STOCK_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("stock_data"))
}

/// Format a date the way the CSV files and the HTTP boundary spell it
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `yyyy-MM-dd` date string
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
}
