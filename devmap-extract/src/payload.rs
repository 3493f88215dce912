//! Decoding of the per-row JSON payload cells.

use chrono::{DateTime, NaiveDateTime, Utc};
use devmap_types::{Alert, MetricMap};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a list of alerts")]
    NotAList,
    #[error("unrecognised timestamp '{0}'")]
    BadTimestamp(String),
}

/// `data` cell: a JSON object of metric values.
pub fn parse_data(cell: &str) -> Result<MetricMap, PayloadError> {
    Ok(MetricMap::from_json_str(cell)?)
}

/// `alerts_info` cell: a JSON list of `{alerttext, creation_timestamp}`.
/// JSON `null` is an empty list.
pub fn parse_alerts(cell: &str) -> Result<Vec<Alert>, PayloadError> {
    match serde_json::from_str::<Value>(cell)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.into_iter().map(alert_from_json).collect()),
        _ => Err(PayloadError::NotAList),
    }
}

fn alert_from_json(item: Value) -> Alert {
    let Value::Object(fields) = item else {
        return Alert::default();
    };
    Alert {
        text: fields.get("alerttext").and_then(scalar_text),
        created: fields.get("creation_timestamp").and_then(scalar_text),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// `receive_timestamp` cell: JSON string or epoch-millisecond number.
///
/// Bare (unquoted) timestamp text is accepted too.
pub fn parse_timestamp(cell: &str) -> Result<DateTime<Utc>, PayloadError> {
    match serde_json::from_str::<Value>(cell) {
        Ok(Value::String(s)) => parse_timestamp_text(&s),
        Ok(Value::Number(n)) => n
            .as_f64()
            .and_then(|ms| timestamp_from_millis(ms as i64))
            .ok_or_else(|| PayloadError::BadTimestamp(cell.to_string())),
        Ok(_) => Err(PayloadError::BadTimestamp(cell.to_string())),
        Err(_) => parse_timestamp_text(cell.trim()),
    }
}

pub fn timestamp_from_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

fn parse_timestamp_text(text: &str) -> Result<DateTime<Utc>, PayloadError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(naive.and_utc());
        }
    }
    Err(PayloadError::BadTimestamp(text.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn alerts_count_every_entry() {
        let alerts = parse_alerts(
            r#"[{"alerttext":"door open","creation_timestamp":"2024-05-01 10:00"},{"alerttext":"low battery"},7]"#,
        )
        .unwrap();
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].text.as_deref(), Some("door open"));
        assert_eq!(alerts[0].created.as_deref(), Some("2024-05-01 10:00"));
        assert_eq!(alerts[1].created, None);
        assert_eq!(alerts[2], Alert::default());
    }

    #[test]
    fn null_alerts_are_empty() {
        assert!(parse_alerts("null").unwrap().is_empty());
        assert!(matches!(parse_alerts("{}"), Err(PayloadError::NotAList)));
        assert!(matches!(parse_alerts("[oops"), Err(PayloadError::Json(_))));
    }

    #[test]
    fn timestamps_in_several_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp(r#""2024-05-01T10:00:00Z""#).unwrap(), expected);
        assert_eq!(parse_timestamp(r#""2024-05-01T12:00:00+02:00""#).unwrap(), expected);
        assert_eq!(parse_timestamp(r#""2024-05-01 10:00:00""#).unwrap(), expected);
        assert_eq!(parse_timestamp("1714557600000").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-05-01T10:00:00Z").unwrap(), expected);
        assert!(parse_timestamp(r#""yesterday""#).is_err());
        assert!(parse_timestamp("true").is_err());
    }
}
