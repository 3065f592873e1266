//! Conversions between JSON values and SQL parameters/rows.
//!
//! Handlers never know the table layout: every column a query returns is
//! surfaced under its own name, and every request field is bound as-is.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::mysql::MySqlRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo};
use tracing::warn;

/// One result row keyed by column name.
pub type JsonRow = serde_json::Map<String, JsonValue>;

/// A positional parameter for a prepared statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&JsonValue> for SqlParam {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => SqlParam::Null,
            JsonValue::Bool(b) => SqlParam::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => SqlParam::Int(i),
                None => SqlParam::Float(n.as_f64().unwrap_or_default()),
            },
            JsonValue::String(s) => SqlParam::Text(s.clone()),
            // Structured values go to the store as their JSON text.
            other => SqlParam::Text(other.to_string()),
        }
    }
}

pub fn sqlite_row_to_json(row: &SqliteRow) -> JsonRow {
    row.columns()
        .iter()
        .map(|col| (col.name().to_string(), sqlite_value(row, col.ordinal())))
        .collect()
}

fn sqlite_value(row: &SqliteRow, idx: usize) -> JsonValue {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(JsonValue::from).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(JsonValue::from).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(JsonValue::String).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return v.map(blob_to_json).unwrap_or(JsonValue::Null);
    }
    undecodable(row.columns()[idx].name())
}

pub fn mysql_row_to_json(row: &MySqlRow) -> JsonRow {
    row.columns()
        .iter()
        .map(|col| (col.name().to_string(), mysql_value(row, col.ordinal())))
        .collect()
}

fn mysql_value(row: &MySqlRow, idx: usize) -> JsonValue {
    if is_json_column(row.columns()[idx].type_info().name()) {
        if let Ok(v) = row.try_get::<Option<JsonValue>, _>(idx) {
            return v.unwrap_or(JsonValue::Null);
        }
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(JsonValue::from).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(idx) {
        return v.map(JsonValue::from).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(JsonValue::from).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(idx) {
        return v.map(|f| JsonValue::from(f as f64)).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<Decimal>, _>(idx) {
        return v.map(decimal_to_json).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<DateTime<Utc>>, _>(idx) {
        return v.map(timestamp_to_json).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<NaiveDateTime>, _>(idx) {
        return v.map(datetime_to_json).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<NaiveDate>, _>(idx) {
        return v.map(date_to_json).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<NaiveTime>, _>(idx) {
        return v.map(time_to_json).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(JsonValue::String).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return v.map(blob_to_json).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        return v.map(JsonValue::Bool).unwrap_or(JsonValue::Null);
    }
    undecodable(row.columns()[idx].name())
}

/// JSON decoding also accepts text columns, so it is reserved for real JSON columns.
fn is_json_column(type_name: &str) -> bool {
    type_name.eq_ignore_ascii_case("JSON")
}

/// DECIMAL is rendered as a string so no precision is lost.
fn decimal_to_json(value: Decimal) -> JsonValue {
    JsonValue::String(value.to_string())
}

fn timestamp_to_json(value: DateTime<Utc>) -> JsonValue {
    JsonValue::String(value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// DATETIME carries no zone; it is reported as UTC, same shape as TIMESTAMP.
fn datetime_to_json(value: NaiveDateTime) -> JsonValue {
    JsonValue::String(value.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}

fn date_to_json(value: NaiveDate) -> JsonValue {
    JsonValue::String(value.format("%Y-%m-%d").to_string())
}

fn time_to_json(value: NaiveTime) -> JsonValue {
    JsonValue::String(value.format("%H:%M:%S").to_string())
}

fn blob_to_json(bytes: Vec<u8>) -> JsonValue {
    JsonValue::String(String::from_utf8_lossy(&bytes).into_owned())
}

fn undecodable(column: &str) -> JsonValue {
    warn!(column = %column, "Unsupported column type, returning null");
    JsonValue::Null
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_param_from_scalars() {
        assert_eq!(SqlParam::from(&json!(null)), SqlParam::Null);
        assert_eq!(SqlParam::from(&json!(true)), SqlParam::Bool(true));
        assert_eq!(SqlParam::from(&json!(42)), SqlParam::Int(42));
        assert_eq!(SqlParam::from(&json!(1.5)), SqlParam::Float(1.5));
        assert_eq!(
            SqlParam::from(&json!("Rust")),
            SqlParam::Text("Rust".to_string())
        );
    }

    #[test]
    fn test_param_from_large_unsigned_falls_back_to_float() {
        let value = json!(u64::MAX);
        assert!(matches!(SqlParam::from(&value), SqlParam::Float(_)));
    }

    #[test]
    fn test_param_from_structured_value_is_json_text() {
        assert_eq!(
            SqlParam::from(&json!({"a": [1, 2]})),
            SqlParam::Text(r#"{"a":[1,2]}"#.to_string())
        );
    }

    #[test]
    fn test_json_column_detection() {
        assert!(is_json_column("JSON"));
        assert!(is_json_column("json"));
        for other in ["VARCHAR", "TEXT", "BLOB", "DECIMAL", "DATETIME"] {
            assert!(!is_json_column(other), "{}", other);
        }
    }

    #[test]
    fn test_decimal_keeps_precision_as_string() {
        let value = Decimal::from_str("12345678901234567.890").unwrap();
        assert_eq!(decimal_to_json(value), json!("12345678901234567.890"));
        assert_eq!(
            decimal_to_json(Decimal::from_str("-0.05").unwrap()),
            json!("-0.05")
        );
    }

    #[test]
    fn test_timestamp_is_utc_with_millis() {
        let value = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(timestamp_to_json(value), json!("2024-03-09T14:05:07.000Z"));
    }

    #[test]
    fn test_datetime_matches_timestamp_shape() {
        let value = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(14, 5, 7, 250)
            .unwrap();
        assert_eq!(datetime_to_json(value), json!("2024-03-09T14:05:07.250Z"));

        let same_instant = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let naive = same_instant.naive_utc();
        assert_eq!(datetime_to_json(naive), timestamp_to_json(same_instant));
    }

    #[test]
    fn test_date_and_time_formatting() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        assert_eq!(date_to_json(date), json!("2023-12-01"));

        let time = NaiveTime::from_hms_opt(8, 0, 59).unwrap();
        assert_eq!(time_to_json(time), json!("08:00:59"));
    }

    #[test]
    fn test_blob_is_lossy_utf8() {
        assert_eq!(blob_to_json(b"abc".to_vec()), json!("abc"));
    }
}
