use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One trading day for one company.
///
/// Absent numeric fields mean "no value" (e.g. no trade that day), never
/// zero; they render as empty strings on the page and serialize as `null`.
/// Field names on the wire keep the legacy camelCase spelling, including
/// the `MKD` suffixes of the two turnover figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Trading date, the natural key for ordering and range filtering
    pub date: NaiveDate,
    pub last_trade_price: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub avg_price: Option<f64>,
    /// Percent change against the previous close
    pub chg: Option<f64>,
    pub volume: Option<u64>,
    #[serde(rename = "turnoverBestMKD")]
    pub turnover_best_mkd: Option<u64>,
    #[serde(rename = "totalTurnoverMKD")]
    pub total_turnover_mkd: Option<u64>,
}

impl Observation {
    pub fn new(
        date: NaiveDate,
        last_trade_price: Option<f64>,
        max: Option<f64>,
        min: Option<f64>,
        avg_price: Option<f64>,
        chg: Option<f64>,
        volume: Option<u64>,
        turnover_best_mkd: Option<u64>,
        total_turnover_mkd: Option<u64>,
    ) -> Self {
        Self {
            date,
            last_trade_price,
            max,
            min,
            avg_price,
            chg,
            volume,
            turnover_best_mkd,
            total_turnover_mkd,
        }
    }
}

// Equality and ordering are by date only; the date is the natural key
// within one company's series.
impl PartialEq for Observation {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
    }
}

impl Eq for Observation {}

impl PartialOrd for Observation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Observation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date)
    }
}

/// Group a digit string with `.` every three digits, from the right
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Render a decimal field the way the legacy pages did: Italian-style
/// grouping (`1234.5` becomes `1.234,5`), at most three fraction digits,
/// empty string when the value is absent.
pub fn format_decimal(value: Option<f64>) -> String {
    let Some(v) = value else {
        return String::new();
    };
    let fixed = format!("{:.3}", v.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };
    let mut out = String::new();
    if v < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

/// Render an integer field grouped per the same convention, empty string
/// when the value is absent.
pub fn format_count(value: Option<u64>) -> String {
    match value {
        Some(v) => group_thousands(&v.to_string()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(date: &str, price: Option<f64>) -> Observation {
        Observation::new(
            date.parse().unwrap(),
            price,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        )
    }

    #[test]
    fn test_ordering_by_date() {
        let mut series = vec![
            observation("2023-01-10", Some(99.0)),
            observation("2023-01-01", Some(100.0)),
            observation("2023-01-05", Some(102.0)),
        ];
        series.sort();
        let dates: Vec<String> = series.iter().map(|o| o.date.to_string()).collect();
        assert_eq!(dates, vec!["2023-01-01", "2023-01-05", "2023-01-10"]);
    }

    #[test]
    fn test_equality_is_by_date() {
        let a = observation("2023-01-05", Some(102.0));
        let b = observation("2023-01-05", None);
        let c = observation("2023-01-06", Some(102.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_format_decimal_grouping() {
        assert_eq!(format_decimal(Some(1234.5)), "1.234,5");
        assert_eq!(format_decimal(Some(1234567.0)), "1.234.567");
        assert_eq!(format_decimal(Some(102.0)), "102");
        assert_eq!(format_decimal(Some(0.5)), "0,5");
        assert_eq!(format_decimal(Some(-1234.5)), "-1.234,5");
        assert_eq!(format_decimal(Some(2540.125)), "2.540,125");
    }

    #[test]
    fn test_format_decimal_absent_is_empty() {
        assert_eq!(format_decimal(None), "");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(Some(1_234_567)), "1.234.567");
        assert_eq!(format_count(Some(512)), "512");
        assert_eq!(format_count(None), "");
    }

    #[test]
    fn test_serializes_legacy_field_names() {
        let o = Observation::new(
            "2023-01-05".parse().unwrap(),
            Some(102.0),
            None,
            None,
            Some(101.5),
            Some(-0.4),
            Some(1200),
            Some(122_400),
            None,
        );
        let value = serde_json::to_value(&o).unwrap();
        assert_eq!(value["date"], "2023-01-05");
        assert_eq!(value["lastTradePrice"], 102.0);
        assert_eq!(value["avgPrice"], 101.5);
        assert_eq!(value["turnoverBestMKD"], 122_400);
        assert!(value["max"].is_null());
        assert!(value["totalTurnoverMKD"].is_null());
    }
}
