//! Reflects Postgres result columns into [`Record`]s by name and declared type.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use feedcache::{FeedId, Record, StoreError, Value};
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, Type};

type DecodeError = Box<dyn std::error::Error + Send + Sync>;

const NUMERIC_POS: u16 = 0x0000;
const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

/// Raw wire bytes of one column, accepted for any column type.
struct RawColumn<'a>(Option<&'a [u8]>);

impl<'a> FromSql<'a> for RawColumn<'a> {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, DecodeError> {
        Ok(RawColumn(Some(raw)))
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, DecodeError> {
        Ok(RawColumn(None))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

pub fn decode_row(feed_id: FeedId, row: &Row) -> Result<Record, StoreError> {
    let mut record = Record::with_capacity(row.len());

    for (idx, column) in row.columns().iter().enumerate() {
        let raw = row
            .try_get::<_, RawColumn>(idx)
            .map_err(|e| StoreError::decode(feed_id, column.name(), e))?;
        let value = decode_value(column.type_(), raw.0)
            .map_err(|e| StoreError::decode(feed_id, column.name(), e))?;
        record.insert(column.name(), value);
    }

    Ok(record)
}

pub fn decode_value(ty: &Type, raw: Option<&[u8]>) -> Result<Value, DecodeError> {
    let Some(raw) = raw else {
        return Ok(Value::Null);
    };

    let value = match *ty {
        Type::BOOL => Value::Bool(bool::from_sql(ty, raw)?),
        Type::INT2 => Value::Int(i16::from_sql(ty, raw)?.into()),
        Type::INT4 => Value::Int(i32::from_sql(ty, raw)?.into()),
        Type::INT8 => Value::Int(i64::from_sql(ty, raw)?),
        Type::OID => Value::Int(u32::from_sql(ty, raw)?.into()),
        Type::FLOAT4 => Value::Float(f32::from_sql(ty, raw)?.into()),
        Type::FLOAT8 => Value::Float(f64::from_sql(ty, raw)?),
        Type::NUMERIC => Value::Numeric(decode_numeric(raw)?),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            Value::Text(String::from_sql(ty, raw)?)
        }
        Type::BYTEA => Value::Bytes(Vec::<u8>::from_sql(ty, raw)?),
        Type::UUID => Value::Uuid(uuid::Uuid::from_sql(ty, raw)?),
        Type::DATE => Value::Date(NaiveDate::from_sql(ty, raw)?),
        Type::TIMESTAMP => Value::Timestamp(NaiveDateTime::from_sql(ty, raw)?.and_utc()),
        Type::TIMESTAMPTZ => Value::Timestamp(DateTime::<Utc>::from_sql(ty, raw)?),
        Type::JSON | Type::JSONB => Value::Json(serde_json::Value::from_sql(ty, raw)?),
        // enums, citext and friends arrive as their text label
        _ => match std::str::from_utf8(raw) {
            Ok(text) => Value::Text(text.to_string()),
            Err(_) => Value::Bytes(raw.to_vec()),
        },
    };

    Ok(value)
}

/// Decode the binary `numeric` wire format into exact decimal text.
///
/// Layout: ndigits, weight, sign, dscale (each u16), then ndigits base-10000
/// digits. `weight` is the power of 10000 of the first digit.
pub fn decode_numeric(raw: &[u8]) -> Result<String, DecodeError> {
    let word = |offset: usize| -> Result<u16, DecodeError> {
        raw.get(offset..offset + 2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]))
            .ok_or_else(|| "numeric value is truncated".into())
    };

    let ndigits = usize::from(word(0)?);
    let weight = i32::from(word(2)? as i16);
    let sign = word(4)?;
    let dscale = usize::from(word(6)?);

    match sign {
        NUMERIC_POS | NUMERIC_NEG => {}
        NUMERIC_NAN => return Ok("NaN".to_string()),
        NUMERIC_PINF => return Ok("Infinity".to_string()),
        NUMERIC_NINF => return Ok("-Infinity".to_string()),
        other => return Err(format!("invalid numeric sign {:#06x}", other).into()),
    }

    let digits = (0..ndigits)
        .map(|n| word(8 + n * 2))
        .collect::<Result<Vec<_>, _>>()?;
    let digit_at = |pos: i32| -> u16 {
        usize::try_from(pos)
            .ok()
            .and_then(|p| digits.get(p).copied())
            .unwrap_or(0)
    };

    let mut out = String::new();
    if sign == NUMERIC_NEG {
        out.push('-');
    }

    if weight < 0 {
        out.push('0');
    } else {
        out.push_str(&digit_at(0).to_string());
        for pos in 1..=weight {
            out.push_str(&format!("{:04}", digit_at(pos)));
        }
    }

    if dscale > 0 {
        let mut frac = String::with_capacity(dscale + 4);
        let mut pos = weight + 1;
        while frac.len() < dscale {
            frac.push_str(&format!("{:04}", digit_at(pos)));
            pos += 1;
        }
        frac.truncate(dscale);
        out.push('.');
        out.push_str(&frac);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn numeric(weight: i16, sign: u16, dscale: u16, digits: &[u16]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(digits.len() as u16).to_be_bytes());
        buf.extend_from_slice(&weight.to_be_bytes());
        buf.extend_from_slice(&sign.to_be_bytes());
        buf.extend_from_slice(&dscale.to_be_bytes());
        for d in digits {
            buf.extend_from_slice(&d.to_be_bytes());
        }
        buf
    }

    #[test]
    fn test_numeric_decoding() {
        let cases: &[(Vec<u8>, &str)] = &[
            (numeric(0, NUMERIC_POS, 2, &[123, 4500]), "123.45"),
            (numeric(0, NUMERIC_NEG, 2, &[19, 9000]), "-19.90"),
            (numeric(-1, NUMERIC_POS, 2, &[500]), "0.05"),
            (numeric(-2, NUMERIC_POS, 5, &[1000]), "0.00001"),
            (numeric(1, NUMERIC_POS, 0, &[1]), "10000"),
            (numeric(1, NUMERIC_POS, 0, &[1234, 5678]), "12345678"),
            (numeric(0, NUMERIC_POS, 2, &[]), "0.00"),
            (numeric(0, NUMERIC_NAN, 0, &[]), "NaN"),
            (numeric(0, NUMERIC_NINF, 0, &[]), "-Infinity"),
        ];

        for (raw, expected) in cases {
            assert_eq!(decode_numeric(raw).unwrap(), *expected);
        }
    }

    #[test]
    fn test_numeric_rejects_truncated_input() {
        let mut raw = numeric(0, NUMERIC_POS, 2, &[123, 4500]);
        raw.truncate(raw.len() - 1);
        assert!(decode_numeric(&raw).is_err());
        assert!(decode_numeric(&[0, 1]).is_err());
    }

    #[test]
    fn test_numeric_rejects_unknown_sign() {
        assert!(decode_numeric(&numeric(0, 0x1234, 0, &[1])).is_err());
    }

    #[test]
    fn test_null_for_any_type() {
        for ty in [Type::INT4, Type::TEXT, Type::NUMERIC, Type::INET] {
            assert_eq!(decode_value(&ty, None).unwrap(), Value::Null);
        }
    }

    #[test]
    fn test_scalar_types() {
        assert_eq!(
            decode_value(&Type::INT4, Some(&5_i32.to_be_bytes())).unwrap(),
            Value::Int(5)
        );
        assert_eq!(
            decode_value(&Type::INT8, Some(&(-7_i64).to_be_bytes())).unwrap(),
            Value::Int(-7)
        );
        assert_eq!(decode_value(&Type::BOOL, Some(&[1])).unwrap(), Value::Bool(true));
        assert_eq!(
            decode_value(&Type::FLOAT8, Some(&2.5_f64.to_be_bytes())).unwrap(),
            Value::Float(2.5)
        );
        assert_eq!(
            decode_value(&Type::VARCHAR, Some(b"Buy now")).unwrap(),
            Value::Text("Buy now".into())
        );
        assert_eq!(
            decode_value(&Type::BYTEA, Some(&[0, 159, 146])).unwrap(),
            Value::Bytes(vec![0, 159, 146])
        );
    }

    #[test]
    fn test_uuid_and_time_types() {
        let id = uuid::Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
        assert_eq!(
            decode_value(&Type::UUID, Some(id.as_bytes())).unwrap(),
            Value::Uuid(id)
        );

        // postgres epoch is 2000-01-01, timestamps are microseconds since then
        let one_day_us = 86_400_000_000_i64;
        assert_eq!(
            decode_value(&Type::TIMESTAMP, Some(&one_day_us.to_be_bytes())).unwrap(),
            Value::Timestamp(Utc.with_ymd_and_hms(2000, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(
            decode_value(&Type::TIMESTAMPTZ, Some(&0_i64.to_be_bytes())).unwrap(),
            Value::Timestamp(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            decode_value(&Type::DATE, Some(&31_i32.to_be_bytes())).unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2000, 2, 1).unwrap())
        );
    }

    #[test]
    fn test_jsonb_strips_version_byte() {
        let mut raw = vec![1_u8];
        raw.extend_from_slice(br#"{"a":1}"#);
        assert_eq!(
            decode_value(&Type::JSONB, Some(raw.as_slice())).unwrap(),
            Value::Json(serde_json::json!({"a": 1}))
        );
    }

    #[test]
    fn test_unknown_types_fall_back_to_text_or_bytes() {
        assert_eq!(
            decode_value(&Type::XML, Some(b"<a/>")).unwrap(),
            Value::Text("<a/>".into())
        );
        assert_eq!(
            decode_value(&Type::INET, Some(&[0xff, 0x00])).unwrap(),
            Value::Bytes(vec![0xff, 0x00])
        );
    }

    #[test]
    fn test_malformed_fixed_width_value_is_an_error() {
        assert!(decode_value(&Type::INT4, Some(&[0, 1])).is_err());
    }
}
