use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::SecondsFormat;
use feedcache::{Record, RetrievalResult, Value};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: String,
}

// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// `{"result": [...], "time": <ms>}`
#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub result: Vec<JsonRecord>,
    pub time: u64,
}

impl From<RetrievalResult> for ItemsResponse {
    fn from(result: RetrievalResult) -> Self {
        let time = result.elapsed_ms();
        Self {
            result: result.records.into_iter().map(JsonRecord).collect(),
            time,
        }
    }
}

/// Renders a record as a plain JSON object in column order.
#[derive(Debug)]
pub struct JsonRecord(pub Record);

impl Serialize for JsonRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0.iter() {
            map.serialize_entry(name, &JsonValue(value))?;
        }
        map.end()
    }
}

struct JsonValue<'a>(&'a Value);

impl Serialize for JsonValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Value::Float(f) if f.is_nan() => serializer.serialize_str("NaN"),
            Value::Float(f) if *f > 0.0 => serializer.serialize_str("Infinity"),
            Value::Float(_) => serializer.serialize_str("-Infinity"),
            Value::Numeric(text) => match exact_f64(text) {
                Some(n) => serializer.serialize_f64(n),
                None => serializer.serialize_str(text),
            },
            Value::Text(text) => serializer.serialize_str(text),
            Value::Bytes(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            Value::Uuid(id) => serializer.collect_str(id),
            Value::Date(date) => serializer.collect_str(date),
            Value::Timestamp(ts) => {
                serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Json(json) => json.serialize(serializer),
        }
    }
}

/// The decimal as an `f64`, only when the float prints back as the same number.
/// Wider decimals stay text so no digits are lost.
fn exact_f64(text: &str) -> Option<f64> {
    let n = text.parse::<f64>().ok().filter(|n| n.is_finite())?;
    let canonical = match text.split_once('.') {
        Some((int, frac)) => match frac.trim_end_matches('0') {
            "" => int.to_string(),
            frac => format!("{}.{}", int, frac),
        },
        None => text.to_string(),
    };
    (n.to_string() == canonical).then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use feedcache::Source;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_items_response_shape() {
        let record = Record::new()
            .with("id", Value::Uuid(Default::default()))
            .with("feed_id", 5_i64)
            .with("price", Value::Numeric("19.90".into()))
            .with("name", "Widget")
            .with("thumb", Value::Bytes(vec![1, 2, 3]))
            .with("day", Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))
            .with(
                "created_at",
                Value::Timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()),
            )
            .with("meta", Value::Json(json!({"tags": ["a"]})))
            .with("note", Value::Null);
        let result = RetrievalResult::new(vec![record], Duration::from_millis(42), Source::Store);

        let body = serde_json::to_value(ItemsResponse::from(result)).unwrap();

        assert_eq!(
            body,
            json!({
                "result": [{
                    "id": "00000000-0000-0000-0000-000000000000",
                    "feed_id": 5,
                    "price": 19.9,
                    "name": "Widget",
                    "thumb": "AQID",
                    "day": "2024-03-01",
                    "created_at": "2024-03-01T12:30:00Z",
                    "meta": {"tags": ["a"]},
                    "note": null
                }],
                "time": 42
            })
        );
    }

    #[test]
    fn test_columns_keep_store_order() {
        let record = Record::new().with("zeta", 1_i64).with("alpha", 2_i64);
        let text = serde_json::to_string(&JsonRecord(record)).unwrap();
        assert_eq!(text, r#"{"zeta":1,"alpha":2}"#);
    }

    #[test]
    fn test_non_finite_values_are_rendered_as_text() {
        let record = Record::new()
            .with("price", Value::Numeric("NaN".into()))
            .with("ratio", f64::NEG_INFINITY);
        let text = serde_json::to_string(&JsonRecord(record)).unwrap();
        assert_eq!(text, r#"{"price":"NaN","ratio":"-Infinity"}"#);
    }

    #[test]
    fn test_wide_numerics_keep_every_digit() {
        let record = Record::new()
            .with("small", Value::Numeric("0.05".into()))
            .with("whole", Value::Numeric("10000".into()))
            .with("zero", Value::Numeric("0.00".into()))
            .with("wide", Value::Numeric("12345678901234567890.12".into()))
            .with("precise", Value::Numeric("0.1234567890123456789".into()));
        let body = serde_json::to_value(JsonRecord(record)).unwrap();

        assert_eq!(
            body,
            json!({
                "small": 0.05,
                "whole": 10000.0,
                "zero": 0.0,
                "wide": "12345678901234567890.12",
                "precise": "0.1234567890123456789"
            })
        );
    }
}
