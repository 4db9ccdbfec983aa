pub mod mysql;

use serde_json::Value;
use chrono::SecondsFormat;
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Column type names as reported by the driver, grouped by the JSON value
/// they decode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Bool,
    Signed,
    Unsigned,
    Float,
    /// Exact numerics; kept as text so no precision is lost.
    Decimal,
    DateTime,
    Timestamp,
    Date,
    Json,
    Other,
}

impl ColumnKind {
    pub(crate) fn from_type_name(name: &str) -> Self {
        let upper = name.to_ascii_uppercase();
        match upper.as_str() {
            "BOOLEAN" => ColumnKind::Bool,
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => ColumnKind::Signed,
            "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
            | "BIGINT UNSIGNED" => ColumnKind::Unsigned,
            "FLOAT" | "DOUBLE" => ColumnKind::Float,
            "DECIMAL" | "NUMERIC" => ColumnKind::Decimal,
            "DATETIME" => ColumnKind::DateTime,
            "TIMESTAMP" => ColumnKind::Timestamp,
            "DATE" => ColumnKind::Date,
            "JSON" => ColumnKind::Json,
            _ => ColumnKind::Other,
        }
    }
}

/// Wraps a decoded nullable value.
pub(crate) fn nullable<T: Into<Value>>(v: Option<T>) -> Value {
    v.map(Into::into).unwrap_or(Value::Null)
}

/// DATETIME carries no zone; it is read as UTC and rendered with
/// millisecond precision, e.g. `2024-03-05T06:07:08.000Z`.
pub(crate) fn datetime_text(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub(crate) fn timestamp_text(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn date_text(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Exact numerics pass through as the server's text.
pub(crate) fn decimal_text(raw: Option<String>) -> Value {
    nullable(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_column_types_map_to_json_kinds() {
        // COUNT(*)
        assert_eq!(ColumnKind::from_type_name("BIGINT"), ColumnKind::Signed);
        // SUM()/AVG() over DECIMAL columns
        assert_eq!(ColumnKind::from_type_name("DECIMAL"), ColumnKind::Decimal);
        assert_eq!(ColumnKind::from_type_name("datetime"), ColumnKind::DateTime);
        assert_eq!(ColumnKind::from_type_name("INT UNSIGNED"), ColumnKind::Unsigned);
        assert_eq!(ColumnKind::from_type_name("VARCHAR"), ColumnKind::Other);
    }

    #[test]
    fn nulls_stay_null() {
        assert_eq!(nullable::<i64>(None), Value::Null);
        assert_eq!(nullable(Some(3_i64)), Value::from(3));
    }

    #[test]
    fn decimals_keep_their_exact_text() {
        assert_eq!(decimal_text(Some("1234567.890".to_string())), Value::from("1234567.890"));
        assert_eq!(decimal_text(Some("0.10".to_string())), Value::from("0.10"));
        assert_eq!(decimal_text(None), Value::Null);
    }

    #[test]
    fn datetimes_render_as_utc_with_millis() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_milli_opt(6, 7, 8, 0))
            .expect("valid datetime");
        assert_eq!(datetime_text(&dt), "2024-03-05T06:07:08.000Z");
        assert_eq!(timestamp_text(&dt.and_utc()), "2024-03-05T06:07:08.000Z");

        let with_millis = NaiveDate::from_ymd_opt(2023, 12, 31)
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 250))
            .expect("valid datetime");
        assert_eq!(datetime_text(&with_millis), "2023-12-31T23:59:59.250Z");
    }

    #[test]
    fn dates_render_as_plain_days() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 9).expect("valid date");
        assert_eq!(date_text(&d), "2024-01-09");
    }
}
