//! Cache payload encoding: a JSON array of records with tagged values.

use crate::error::CodecError;
use crate::record::Record;
use bytes::Bytes;

pub fn encode(records: &[Record]) -> Result<Bytes, CodecError> {
    Ok(Bytes::from(serde_json::to_vec(records)?))
}

pub fn decode(payload: &[u8]) -> Result<Vec<Record>, CodecError> {
    Ok(serde_json::from_slice(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample() -> Vec<Record> {
        vec![
            Record::new()
                .with("id", Value::Uuid(uuid::Uuid::nil()))
                .with("feed_id", 5_i64)
                .with("price", Value::Numeric("19.90".into()))
                .with("ratio", 0.25_f64)
                .with("active", true)
                .with(
                    "created_at",
                    Value::Timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()),
                )
                .with("day", Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))
                .with("meta", Value::Json(serde_json::json!({"tags": ["a", "b"]})))
                .with("thumb", Value::Bytes(vec![1, 2, 3]))
                .with("note", Value::Null),
            Record::new().with("feed_id", 5_i64).with("name", "second"),
        ]
    }

    #[test]
    fn test_decode_reproduces_every_variant() {
        let records = sample();
        let payload = encode(&records).unwrap();
        assert_eq!(decode(&payload).unwrap(), records);
    }

    #[test]
    fn test_non_finite_floats_survive_the_cache() {
        let records = vec![
            Record::new()
                .with("nan", f64::NAN)
                .with("up", f64::INFINITY)
                .with("down", f64::NEG_INFINITY),
        ];

        let payload = encode(&records).unwrap();
        assert_eq!(
            std::str::from_utf8(&payload).unwrap(),
            r#"[{"nan":{"type":"float","value":"NaN"},"up":{"type":"float","value":"Infinity"},"down":{"type":"float","value":"-Infinity"}}]"#
        );

        let decoded = decode(&payload).unwrap();
        assert!(matches!(decoded[0].get("nan"), Some(Value::Float(f)) if f.is_nan()));
        assert_eq!(decoded[0].get("up"), Some(&Value::Float(f64::INFINITY)));
        assert_eq!(decoded[0].get("down"), Some(&Value::Float(f64::NEG_INFINITY)));
    }

    #[test]
    fn test_empty_sequence() {
        let payload = encode(&[]).unwrap();
        assert_eq!(&payload[..], b"[]");
        assert!(decode(&payload).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_payloads_are_errors() {
        for payload in [
            &b"not json"[..],
            &b"{\"id\":1}"[..],
            &b"[{\"id\":{\"type\":\"unknown\",\"value\":1}}]"[..],
            &b"[{\"r\":{\"type\":\"float\",\"value\":\"fast\"}}]"[..],
            &[0xff, 0xfe, 0x00][..],
            &b""[..],
        ] {
            assert!(decode(payload).is_err(), "payload {:?} should not decode", payload);
        }
    }
}
