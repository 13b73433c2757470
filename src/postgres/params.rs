use std::error::Error;
use std::str::FromStr;

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

use crate::types::RowValues;

type BoxError = Box<dyn Error + Sync + Send>;

/// Borrowed parameter list in the shape `tokio_postgres` expects.
pub struct Params<'a> {
    references: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> Params<'a> {
    #[must_use]
    pub fn convert(params: &'a [RowValues]) -> Params<'a> {
        let references = params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        Params { references }
    }

    #[must_use]
    pub fn as_refs(&self) -> &[&(dyn ToSql + Sync)] {
        &self.references
    }
}

fn is_text(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN
    )
}

/// Parameters are encoded for the column type the server inferred, not for the Rust variant.
///
/// The builder binds everything it parsed from user input as text, so text has to land in
/// integer, numeric, date, and timestamp columns as well. Every other pairing is converted
/// explicitly or rejected; a value is never written in a wire format the column does not use.
impl ToSql for RowValues {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            RowValues::Null => Ok(IsNull::Yes),
            RowValues::Int(i) => int_to_sql(*i, ty, out),
            RowValues::Float(f) => float_to_sql(*f, ty, out),
            RowValues::Text(s) => text_to_sql(s, ty, out),
            RowValues::Bool(b) => bool_to_sql(*b, ty, out),
            RowValues::Timestamp(dt) => timestamp_to_sql(dt, ty, out),
            RowValues::JSON(jsval) => match *ty {
                Type::JSON | Type::JSONB => jsval.to_sql(ty, out),
                _ if is_text(ty) => jsval.to_string().to_sql(ty, out),
                _ => Err(mismatch("json", ty)),
            },
            RowValues::Blob(bytes) => match *ty {
                Type::BYTEA => bytes.to_sql(ty, out),
                _ => Err(mismatch("binary", ty)),
            },
        }
    }

    fn accepts(ty: &Type) -> bool {
        is_text(ty)
            || matches!(
                *ty,
                Type::INT2
                    | Type::INT4
                    | Type::INT8
                    | Type::FLOAT4
                    | Type::FLOAT8
                    | Type::NUMERIC
                    | Type::BOOL
                    | Type::DATE
                    | Type::TIME
                    | Type::TIMESTAMP
                    | Type::TIMESTAMPTZ
                    | Type::JSON
                    | Type::JSONB
                    | Type::BYTEA
            )
    }

    to_sql_checked!();
}

fn mismatch(kind: &str, ty: &Type) -> BoxError {
    format!("cannot encode {kind} value as postgres `{ty}`").into()
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn int_to_sql(value: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(value)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(value)?.to_sql(ty, out),
        Type::INT8 => value.to_sql(ty, out),
        Type::FLOAT4 => (value as f32).to_sql(ty, out),
        Type::FLOAT8 => (value as f64).to_sql(ty, out),
        Type::NUMERIC => Decimal::from(value).to_sql(ty, out),
        Type::BOOL => (value != 0).to_sql(ty, out),
        _ if is_text(ty) => value.to_string().to_sql(ty, out),
        _ => Err(mismatch("integer", ty)),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_sql(value: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::FLOAT4 => (value as f32).to_sql(ty, out),
        Type::FLOAT8 => value.to_sql(ty, out),
        Type::NUMERIC => Decimal::from_str(&value.to_string())?.to_sql(ty, out),
        Type::INT2 | Type::INT4 | Type::INT8 => {
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
            let whole = value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64;
            if !whole {
                return Err(format!("cannot store {value} in `{ty}` without losing data").into());
            }
            int_to_sql(value as i64, ty, out)
        }
        _ if is_text(ty) => value.to_string().to_sql(ty, out),
        _ => Err(mismatch("float", ty)),
    }
}

fn bool_to_sql(value: bool, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::BOOL => value.to_sql(ty, out),
        Type::INT2 | Type::INT4 | Type::INT8 => int_to_sql(i64::from(value), ty, out),
        _ if is_text(ty) => value.to_string().to_sql(ty, out),
        _ => Err(mismatch("boolean", ty)),
    }
}

fn text_to_sql(value: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    let trimmed = value.trim();
    match *ty {
        Type::INT2 | Type::INT4 | Type::INT8 => int_to_sql(trimmed.parse()?, ty, out),
        Type::FLOAT4 | Type::FLOAT8 => float_to_sql(trimmed.parse()?, ty, out),
        Type::NUMERIC => Decimal::from_str(trimmed)?.to_sql(ty, out),
        Type::BOOL => parse_bool(trimmed)?.to_sql(ty, out),
        Type::DATE => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")?.to_sql(ty, out),
        Type::TIME => parse_time(trimmed)?.to_sql(ty, out),
        Type::TIMESTAMP | Type::TIMESTAMPTZ => {
            timestamp_to_sql(&parse_timestamp(trimmed)?, ty, out)
        }
        Type::JSON | Type::JSONB => serde_json::from_str::<serde_json::Value>(value)
            .unwrap_or_else(|_| serde_json::Value::String(value.to_string()))
            .to_sql(ty, out),
        Type::BYTEA => value.as_bytes().to_sql(ty, out),
        _ if is_text(ty) => value.to_sql(ty, out),
        _ => Err(mismatch("text", ty)),
    }
}

fn timestamp_to_sql(
    dt: &NaiveDateTime,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, BoxError> {
    match *ty {
        Type::DATE => dt.date().to_sql(ty, out),
        Type::TIME => dt.time().to_sql(ty, out),
        Type::TIMESTAMP => dt.to_sql(ty, out),
        Type::TIMESTAMPTZ => dt.and_utc().to_sql(ty, out),
        _ if is_text(ty) => dt.format("%F %T%.f").to_string().to_sql(ty, out),
        _ => Err(mismatch("timestamp", ty)),
    }
}

fn parse_bool(value: &str) -> Result<bool, BoxError> {
    match value.to_ascii_lowercase().as_str() {
        "t" | "true" | "1" | "yes" | "on" => Ok(true),
        "f" | "false" | "0" | "no" | "off" => Ok(false),
        other => Err(format!("invalid boolean literal `{other}`").into()),
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, BoxError> {
    Ok(NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))?)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<NaiveDateTime, BoxError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")?;
    Ok(date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lands_in_typed_columns() {
        let mut out = BytesMut::new();
        let value = RowValues::Text("42".into());
        assert!(matches!(value.to_sql(&Type::INT4, &mut out), Ok(IsNull::No)));
        assert_eq!(&out[..], &42i32.to_be_bytes());

        let mut out = BytesMut::new();
        assert!(RowValues::Text("abc".into()).to_sql(&Type::INT8, &mut out).is_err());
    }

    #[test]
    fn integers_respect_column_width() {
        let mut out = BytesMut::new();
        assert!(RowValues::Int(70_000).to_sql(&Type::INT2, &mut out).is_err());
        let mut out = BytesMut::new();
        RowValues::Int(7).to_sql(&Type::INT2, &mut out).unwrap();
        assert_eq!(&out[..], &7i16.to_be_bytes());
    }

    #[test]
    fn timestamps_accept_several_layouts() {
        assert!(parse_timestamp("2024-01-02 03:04:05").is_ok());
        assert!(parse_timestamp("2024-01-02T03:04:05.250").is_ok());
        assert!(parse_timestamp("2024-01-02T03:04:05Z").is_ok());
        let midnight = parse_timestamp("2024-01-02").unwrap();
        assert_eq!(midnight.format("%H:%M:%S").to_string(), "00:00:00");
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn fractional_floats_are_not_written_into_integer_columns() {
        let mut out = BytesMut::new();
        let err = RowValues::Float(123.45).to_sql(&Type::INT8, &mut out).err().unwrap();
        assert!(err.to_string().contains("int8"), "{err}");
        assert!(out.is_empty());

        let mut out = BytesMut::new();
        assert!(RowValues::Float(123.45).to_sql(&Type::INT4, &mut out).is_err());

        let mut out = BytesMut::new();
        RowValues::Float(42.0).to_sql(&Type::INT8, &mut out).unwrap();
        assert_eq!(&out[..], &42i64.to_be_bytes());

        let mut out = BytesMut::new();
        RowValues::Float(12.5).to_sql(&Type::FLOAT4, &mut out).unwrap();
        assert_eq!(&out[..], &12.5f32.to_be_bytes());
    }

    #[test]
    fn mismatched_pairs_are_errors() {
        let cases = [
            (RowValues::Bool(true), Type::FLOAT8),
            (RowValues::Int(20_240_102), Type::DATE),
            (RowValues::Float(1.5), Type::TIMESTAMP),
            (RowValues::Blob(vec![1, 2]), Type::INT4),
            (RowValues::JSON(serde_json::json!([1])), Type::INT8),
            (RowValues::Text("x".into()), Type::TIMESTAMPTZ),
        ];
        for (value, ty) in cases {
            let mut out = BytesMut::new();
            assert!(value.to_sql(&ty, &mut out).is_err(), "{value:?} as {ty}");
        }
    }

    #[test]
    fn booleans_widen_to_integers() {
        let mut out = BytesMut::new();
        RowValues::Bool(true).to_sql(&Type::INT4, &mut out).unwrap();
        assert_eq!(&out[..], &1i32.to_be_bytes());
    }

    #[test]
    fn numeric_is_not_rejected_up_front() {
        assert!(<RowValues as ToSql>::accepts(&Type::NUMERIC));
        assert!(!<RowValues as ToSql>::accepts(&Type::UUID));
    }
}
