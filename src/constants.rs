//! CSV format constants and runtime defaults.
//!
//! Observation data lives in one CSV file per company, named
//! `<COMPANY>.csv`, with a header row. Columns follow the legacy daily
//! export: date, lastTradePrice, max, min, avgPrice, chg, volume,
//! turnoverBestMKD, totalTurnoverMKD.

/// Number of columns in a company CSV row
pub const CSV_COLUMNS: usize = 9;

/// Column indices for company CSV files (0-indexed)
pub mod csv_column {
    pub const DATE: usize = 0;
    pub const LAST_TRADE_PRICE: usize = 1;
    pub const MAX: usize = 2;
    pub const MIN: usize = 3;
    pub const AVG_PRICE: usize = 4;
    pub const CHG: usize = 5;
    pub const VOLUME: usize = 6;
    pub const TURNOVER_BEST_MKD: usize = 7;
    pub const TOTAL_TURNOVER_MKD: usize = 8;
}

/// Date format used by the CSV files and the HTTP boundary
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default HTTP port for `serve`
pub const DEFAULT_PORT: u16 = 8080;

/// TTL for stored filter results, seconds. Long enough to survive the
/// redirect after a POST plus page reloads within a browsing session.
pub const RESULT_CACHE_TTL_SECONDS: i64 = 1800;
