//! Typed projections of raw values.
//!
//! Every supported Rust type is one row of the table at the bottom of this
//! module: its label, the value a null reads as, the strict projection used
//! by typed reads, and the lenient conversion used by
//! [`convert_value`](crate::convert::convert_value).
//!
//! Strict projections only widen. `i64` accepts any integer column, `i16`
//! accepts TINYINT and SMALLINT, and unsigned types are read through the
//! next wider signed read (`u16` through an `i32` read, `u32` through an
//! `i64` read, `u64` through the widest numeric value available).

use std::fmt::Display;
use std::str::FromStr;

use bytes::Bytes;

use crate::error::TypeError;
use crate::value::{AnsiString, SqlValue};

/// A Rust type that raw values can be projected onto.
pub trait FromSqlValue: Sized {
    /// Label used in error messages.
    const TARGET: &'static str;

    /// The value a SQL NULL reads as.
    fn null_default() -> Self;

    /// Strict, lossless projection of a non-null value.
    fn from_sql_value(value: &SqlValue) -> Result<Self, TypeError>;

    /// Lenient conversion, allowing parsing and narrowing with range checks.
    fn convert_sql_value(value: &SqlValue) -> Result<Self, TypeError> {
        Self::from_sql_value(value).map_err(|e| match e {
            TypeError::TypeMismatch { .. } => TypeError::unsupported(value, Self::TARGET),
            other => other,
        })
    }

    /// Null-aware strict read: NULL yields [`FromSqlValue::null_default`].
    fn from_nullable(value: &SqlValue) -> Result<Self, TypeError> {
        if value.is_null() {
            Ok(Self::null_default())
        } else {
            Self::from_sql_value(value)
        }
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    const TARGET: &'static str = T::TARGET;

    fn null_default() -> Self {
        None
    }

    fn from_sql_value(value: &SqlValue) -> Result<Self, TypeError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_sql_value(value).map(Some)
        }
    }

    fn convert_sql_value(value: &SqlValue) -> Result<Self, TypeError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::convert_sql_value(value).map(Some)
        }
    }
}

// =============================================================================
// Strict projections
// =============================================================================

/// Integer value together with the width of the column it came from.
fn integer_with_rank(value: &SqlValue) -> Option<(i64, u8)> {
    match value {
        SqlValue::TinyInt(v) => Some((i64::from(*v), 1)),
        SqlValue::SmallInt(v) => Some((i64::from(*v), 2)),
        SqlValue::Int(v) => Some((i64::from(*v), 3)),
        SqlValue::BigInt(v) => Some((*v, 4)),
        _ => None,
    }
}

fn integer_up_to<T>(value: &SqlValue, max_rank: u8) -> Result<T, TypeError>
where
    T: FromSqlValue + TryFrom<i64>,
{
    match integer_with_rank(value) {
        Some((v, rank)) if rank <= max_rank => narrow(v),
        _ => Err(TypeError::mismatch(value, T::TARGET)),
    }
}

fn narrow<W, T>(wide: W) -> Result<T, TypeError>
where
    W: Copy + Display,
    T: FromSqlValue + TryFrom<W>,
{
    T::try_from(wide).map_err(|_| TypeError::out_of_range(wide, T::TARGET))
}

fn project_bool(value: &SqlValue) -> Result<bool, TypeError> {
    match value {
        SqlValue::Bool(v) => Ok(*v),
        other => Err(TypeError::mismatch(other, bool::TARGET)),
    }
}

fn project_u8(value: &SqlValue) -> Result<u8, TypeError> {
    integer_up_to(value, 1)
}

fn project_i16(value: &SqlValue) -> Result<i16, TypeError> {
    integer_up_to(value, 2)
}

fn project_i32(value: &SqlValue) -> Result<i32, TypeError> {
    integer_up_to(value, 3)
}

fn project_i64(value: &SqlValue) -> Result<i64, TypeError> {
    integer_up_to(value, 4)
}

fn project_i8(value: &SqlValue) -> Result<i8, TypeError> {
    narrow(project_i16(value)?)
}

fn project_u16(value: &SqlValue) -> Result<u16, TypeError> {
    narrow(project_i32(value)?)
}

fn project_u32(value: &SqlValue) -> Result<u32, TypeError> {
    narrow(project_i64(value)?)
}

fn project_u64(value: &SqlValue) -> Result<u64, TypeError> {
    match value {
        #[cfg(feature = "decimal")]
        SqlValue::Decimal(d) => {
            use rust_decimal::prelude::ToPrimitive;
            if d.fract().is_zero() {
                d.to_u64().ok_or_else(|| TypeError::out_of_range(d, u64::TARGET))
            } else {
                Err(TypeError::mismatch(value, u64::TARGET))
            }
        }
        other => narrow(project_i64(other)?),
    }
}

fn project_f32(value: &SqlValue) -> Result<f32, TypeError> {
    match value {
        SqlValue::Float(v) => Ok(*v),
        SqlValue::TinyInt(v) => Ok(f32::from(*v)),
        SqlValue::SmallInt(v) => Ok(f32::from(*v)),
        other => Err(TypeError::mismatch(other, f32::TARGET)),
    }
}

fn project_f64(value: &SqlValue) -> Result<f64, TypeError> {
    match value {
        SqlValue::Double(v) => Ok(*v),
        SqlValue::Float(v) => Ok(f64::from(*v)),
        SqlValue::TinyInt(v) => Ok(f64::from(*v)),
        SqlValue::SmallInt(v) => Ok(f64::from(*v)),
        SqlValue::Int(v) => Ok(f64::from(*v)),
        other => Err(TypeError::mismatch(other, f64::TARGET)),
    }
}

fn project_string(value: &SqlValue) -> Result<String, TypeError> {
    match value {
        SqlValue::String(v) => Ok(v.clone()),
        other => Err(TypeError::mismatch(other, String::TARGET)),
    }
}

fn project_ansi_string(value: &SqlValue) -> Result<AnsiString, TypeError> {
    match value {
        SqlValue::String(v) => Ok(AnsiString(v.clone())),
        other => Err(TypeError::mismatch(other, AnsiString::TARGET)),
    }
}

fn project_bytes(value: &SqlValue) -> Result<Bytes, TypeError> {
    match value {
        SqlValue::Binary(v) => Ok(v.clone()),
        other => Err(TypeError::mismatch(other, Bytes::TARGET)),
    }
}

fn project_vec_u8(value: &SqlValue) -> Result<Vec<u8>, TypeError> {
    match value {
        SqlValue::Binary(v) => Ok(v.to_vec()),
        other => Err(TypeError::mismatch(other, Vec::<u8>::TARGET)),
    }
}

// =============================================================================
// Lenient conversions
// =============================================================================

fn parse_str<T>(text: &str) -> Result<T, TypeError>
where
    T: FromSqlValue + FromStr,
    T::Err: Display,
{
    text.trim().parse().map_err(|e: T::Err| TypeError::Parse {
        value: text.to_string(),
        target: T::TARGET,
        reason: e.to_string(),
    })
}

fn float_to_i128(v: f64, target: &'static str) -> Result<i128, TypeError> {
    if v.is_finite() && v >= i128::MIN as f64 && v <= i128::MAX as f64 {
        Ok(v.round_ties_even() as i128)
    } else {
        Err(TypeError::out_of_range(v, target))
    }
}

fn convert_integer<T>(value: &SqlValue) -> Result<T, TypeError>
where
    T: FromSqlValue + TryFrom<i128> + FromStr,
    T::Err: Display,
{
    let wide: i128 = match value {
        SqlValue::Bool(v) => i128::from(*v),
        SqlValue::TinyInt(v) => i128::from(*v),
        SqlValue::SmallInt(v) => i128::from(*v),
        SqlValue::Int(v) => i128::from(*v),
        SqlValue::BigInt(v) => i128::from(*v),
        SqlValue::Float(v) => float_to_i128(f64::from(*v), T::TARGET)?,
        SqlValue::Double(v) => float_to_i128(*v, T::TARGET)?,
        #[cfg(feature = "decimal")]
        SqlValue::Decimal(d) => {
            use rust_decimal::prelude::ToPrimitive;
            d.round()
                .to_i128()
                .ok_or_else(|| TypeError::out_of_range(d, T::TARGET))?
        }
        SqlValue::String(s) => return parse_str(s),
        other => return Err(TypeError::unsupported(other, T::TARGET)),
    };

    narrow(wide)
}

fn convert_f64(value: &SqlValue) -> Result<f64, TypeError> {
    match value {
        SqlValue::Bool(v) => Ok(if *v { 1.0 } else { 0.0 }),
        SqlValue::BigInt(v) => Ok(*v as f64),
        #[cfg(feature = "decimal")]
        SqlValue::Decimal(d) => {
            use rust_decimal::prelude::ToPrimitive;
            d.to_f64().ok_or_else(|| TypeError::out_of_range(d, f64::TARGET))
        }
        SqlValue::String(s) => parse_str(s),
        other => project_f64(other).map_err(|_| TypeError::unsupported(other, f64::TARGET)),
    }
}

fn convert_f32(value: &SqlValue) -> Result<f32, TypeError> {
    match value {
        SqlValue::Float(v) => Ok(*v),
        SqlValue::String(s) => parse_str(s),
        other => convert_f64(other)
            .map(|v| v as f32)
            .map_err(|_| TypeError::unsupported(other, f32::TARGET)),
    }
}

fn convert_bool(value: &SqlValue) -> Result<bool, TypeError> {
    match value {
        SqlValue::Bool(v) => Ok(*v),
        SqlValue::String(s) => match s.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            t if t.eq_ignore_ascii_case("true") => Ok(true),
            t if t.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(TypeError::Parse {
                value: s.clone(),
                target: bool::TARGET,
                reason: "expected true, false, 1 or 0".to_string(),
            }),
        },
        other => match integer_with_rank(other) {
            Some((v, _)) => Ok(v != 0),
            None => convert_f64(other)
                .map(|v| v != 0.0)
                .map_err(|_| TypeError::unsupported(other, bool::TARGET)),
        },
    }
}

fn convert_string(value: &SqlValue) -> Result<String, TypeError> {
    match value {
        SqlValue::String(s) => Ok(s.clone()),
        SqlValue::Binary(_) | SqlValue::Null => Err(TypeError::unsupported(value, String::TARGET)),
        other => Ok(other.to_string()),
    }
}

fn convert_bytes(value: &SqlValue) -> Result<Bytes, TypeError> {
    project_bytes(value).map_err(|_| TypeError::unsupported(value, Bytes::TARGET))
}

fn convert_vec_u8(value: &SqlValue) -> Result<Vec<u8>, TypeError> {
    project_vec_u8(value).map_err(|_| TypeError::unsupported(value, Vec::<u8>::TARGET))
}

fn convert_ansi_string(value: &SqlValue) -> Result<AnsiString, TypeError> {
    convert_string(value)
        .map(AnsiString)
        .map_err(|_| TypeError::unsupported(value, AnsiString::TARGET))
}

// =============================================================================
// Projection table
// =============================================================================

macro_rules! projection_table {
    ($($ty:ty => $target:literal, null: $default:expr, get: $get:expr, convert: $convert:expr;)*) => {
        $(
            impl FromSqlValue for $ty {
                const TARGET: &'static str = $target;

                fn null_default() -> Self {
                    $default
                }

                fn from_sql_value(value: &SqlValue) -> Result<Self, TypeError> {
                    $get(value)
                }

                fn convert_sql_value(value: &SqlValue) -> Result<Self, TypeError> {
                    $convert(value)
                }
            }
        )*
    };
}

projection_table! {
    bool => "bool", null: false, get: project_bool, convert: convert_bool;
    u8 => "u8", null: 0, get: project_u8, convert: convert_integer::<u8>;
    i8 => "i8", null: 0, get: project_i8, convert: convert_integer::<i8>;
    i16 => "i16", null: 0, get: project_i16, convert: convert_integer::<i16>;
    u16 => "u16", null: 0, get: project_u16, convert: convert_integer::<u16>;
    i32 => "i32", null: 0, get: project_i32, convert: convert_integer::<i32>;
    u32 => "u32", null: 0, get: project_u32, convert: convert_integer::<u32>;
    i64 => "i64", null: 0, get: project_i64, convert: convert_integer::<i64>;
    u64 => "u64", null: 0, get: project_u64, convert: convert_integer::<u64>;
    f32 => "f32", null: 0.0, get: project_f32, convert: convert_f32;
    f64 => "f64", null: 0.0, get: project_f64, convert: convert_f64;
    String => "String", null: String::new(), get: project_string, convert: convert_string;
    AnsiString => "AnsiString", null: AnsiString::default(), get: project_ansi_string, convert: convert_ansi_string;
    Bytes => "Bytes", null: Bytes::new(), get: project_bytes, convert: convert_bytes;
    Vec<u8> => "Vec<u8>", null: Vec::new(), get: project_vec_u8, convert: convert_vec_u8;
}

#[cfg(feature = "decimal")]
mod decimal {
    use rust_decimal::Decimal;

    use super::{FromSqlValue, integer_with_rank, parse_str};
    use crate::error::TypeError;
    use crate::value::SqlValue;

    fn project_decimal(value: &SqlValue) -> Result<Decimal, TypeError> {
        match value {
            SqlValue::Decimal(d) => Ok(*d),
            other => integer_with_rank(other)
                .map(|(v, _)| Decimal::from(v))
                .ok_or_else(|| TypeError::mismatch(other, Decimal::TARGET)),
        }
    }

    fn convert_decimal(value: &SqlValue) -> Result<Decimal, TypeError> {
        match value {
            SqlValue::Bool(v) => Ok(if *v { Decimal::ONE } else { Decimal::ZERO }),
            SqlValue::Float(v) => {
                Decimal::try_from(*v).map_err(|_| TypeError::out_of_range(v, Decimal::TARGET))
            }
            SqlValue::Double(v) => {
                Decimal::try_from(*v).map_err(|_| TypeError::out_of_range(v, Decimal::TARGET))
            }
            SqlValue::String(s) => parse_str(s),
            other => project_decimal(other)
                .map_err(|_| TypeError::unsupported(other, Decimal::TARGET)),
        }
    }

    projection_table! {
        Decimal => "Decimal", null: Decimal::ZERO, get: project_decimal, convert: convert_decimal;
    }
}

#[cfg(feature = "chrono")]
mod datetime {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use super::{FromSqlValue, parse_str};
    use crate::error::TypeError;
    use crate::value::SqlValue;

    fn project_date(value: &SqlValue) -> Result<NaiveDate, TypeError> {
        match value {
            SqlValue::Date(v) => Ok(*v),
            other => Err(TypeError::mismatch(other, NaiveDate::TARGET)),
        }
    }

    fn project_time(value: &SqlValue) -> Result<NaiveTime, TypeError> {
        match value {
            SqlValue::Time(v) => Ok(*v),
            other => Err(TypeError::mismatch(other, NaiveTime::TARGET)),
        }
    }

    fn project_datetime(value: &SqlValue) -> Result<NaiveDateTime, TypeError> {
        match value {
            SqlValue::DateTime(v) => Ok(*v),
            SqlValue::Date(v) => Ok(v.and_time(NaiveTime::default())),
            other => Err(TypeError::mismatch(other, NaiveDateTime::TARGET)),
        }
    }

    fn convert_date(value: &SqlValue) -> Result<NaiveDate, TypeError> {
        match value {
            SqlValue::DateTime(v) => Ok(v.date()),
            SqlValue::String(s) => parse_str(s),
            other => project_date(other).map_err(|_| TypeError::unsupported(other, NaiveDate::TARGET)),
        }
    }

    fn convert_time(value: &SqlValue) -> Result<NaiveTime, TypeError> {
        match value {
            SqlValue::DateTime(v) => Ok(v.time()),
            SqlValue::String(s) => parse_str(s),
            other => project_time(other).map_err(|_| TypeError::unsupported(other, NaiveTime::TARGET)),
        }
    }

    fn convert_datetime(value: &SqlValue) -> Result<NaiveDateTime, TypeError> {
        match value {
            SqlValue::String(s) => {
                let text = s.trim();
                NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
                    .or_else(|_| text.parse::<NaiveDateTime>())
                    .map_err(|e| TypeError::Parse {
                        value: s.clone(),
                        target: NaiveDateTime::TARGET,
                        reason: e.to_string(),
                    })
            }
            other => project_datetime(other)
                .map_err(|_| TypeError::unsupported(other, NaiveDateTime::TARGET)),
        }
    }

    projection_table! {
        NaiveDate => "NaiveDate", null: NaiveDate::default(), get: project_date, convert: convert_date;
        NaiveTime => "NaiveTime", null: NaiveTime::default(), get: project_time, convert: convert_time;
        NaiveDateTime => "NaiveDateTime", null: NaiveDateTime::default(), get: project_datetime, convert: convert_datetime;
    }
}

#[cfg(feature = "uuid")]
mod guid {
    use uuid::Uuid;

    use super::{FromSqlValue, parse_str};
    use crate::error::TypeError;
    use crate::value::SqlValue;

    fn project_uuid(value: &SqlValue) -> Result<Uuid, TypeError> {
        match value {
            SqlValue::Uuid(v) => Ok(*v),
            other => Err(TypeError::mismatch(other, Uuid::TARGET)),
        }
    }

    fn convert_uuid(value: &SqlValue) -> Result<Uuid, TypeError> {
        match value {
            SqlValue::String(s) => parse_str(s),
            SqlValue::Binary(b) => Uuid::from_slice(b).map_err(|e| TypeError::Parse {
                value: value.to_string(),
                target: Uuid::TARGET,
                reason: e.to_string(),
            }),
            other => project_uuid(other).map_err(|_| TypeError::unsupported(other, Uuid::TARGET)),
        }
    }

    projection_table! {
        Uuid => "Uuid", null: Uuid::nil(), get: project_uuid, convert: convert_uuid;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_reads_widen_only() {
        assert_eq!(i64::from_sql_value(&SqlValue::TinyInt(200)).unwrap(), 200);
        assert_eq!(i32::from_sql_value(&SqlValue::SmallInt(-5)).unwrap(), -5);
        assert!(matches!(
            i16::from_sql_value(&SqlValue::Int(1)),
            Err(TypeError::TypeMismatch { expected: "i16", .. })
        ));
        assert!(i32::from_sql_value(&SqlValue::String("1".into())).is_err());
    }

    #[test]
    fn test_unsigned_reads_through_wider_signed() {
        assert_eq!(u16::from_sql_value(&SqlValue::Int(65_535)).unwrap(), 65_535);
        assert!(matches!(
            u16::from_sql_value(&SqlValue::Int(-1)),
            Err(TypeError::OutOfRange { target: "u16", .. })
        ));
        assert_eq!(
            u32::from_sql_value(&SqlValue::BigInt(4_000_000_000)).unwrap(),
            4_000_000_000
        );
        assert_eq!(i8::from_sql_value(&SqlValue::SmallInt(-128)).unwrap(), -128);
        assert!(i8::from_sql_value(&SqlValue::SmallInt(300)).is_err());
    }

    #[cfg(feature = "decimal")]
    #[test]
    fn test_u64_reads_generic_value() {
        let big = rust_decimal::Decimal::from(u64::MAX);
        assert_eq!(u64::from_sql_value(&SqlValue::Decimal(big)).unwrap(), u64::MAX);
        assert_eq!(u64::from_sql_value(&SqlValue::BigInt(12)).unwrap(), 12);
        assert!(u64::from_sql_value(&SqlValue::BigInt(-1)).is_err());
        assert_eq!(SqlValue::from(u64::MAX), SqlValue::Decimal(big));
    }

    #[test]
    fn test_nullable_reads() {
        assert_eq!(i32::from_nullable(&SqlValue::Null).unwrap(), 0);
        assert_eq!(String::from_nullable(&SqlValue::Null).unwrap(), "");
        assert_eq!(Option::<i32>::from_nullable(&SqlValue::Null).unwrap(), None);
        assert_eq!(
            Option::<i32>::from_nullable(&SqlValue::Int(3)).unwrap(),
            Some(3)
        );
        assert!(!bool::from_nullable(&SqlValue::Null).unwrap());
    }

    #[test]
    fn test_floats() {
        assert_eq!(f64::from_sql_value(&SqlValue::Float(1.5)).unwrap(), 1.5);
        assert_eq!(f64::from_sql_value(&SqlValue::Int(7)).unwrap(), 7.0);
        assert!(f64::from_sql_value(&SqlValue::BigInt(7)).is_err());
        assert_eq!(f64::convert_sql_value(&SqlValue::BigInt(7)).unwrap(), 7.0);
        assert_eq!(f32::convert_sql_value(&SqlValue::from(" 2.5 ")).unwrap(), 2.5);
    }

    #[test]
    fn test_convert_integers() {
        assert_eq!(i32::convert_sql_value(&SqlValue::from("42")).unwrap(), 42);
        assert_eq!(i32::convert_sql_value(&SqlValue::BigInt(42)).unwrap(), 42);
        assert_eq!(i32::convert_sql_value(&SqlValue::Double(2.5)).unwrap(), 2);
        assert_eq!(i32::convert_sql_value(&SqlValue::Double(3.5)).unwrap(), 4);
        assert_eq!(u8::convert_sql_value(&SqlValue::Bool(true)).unwrap(), 1);
        assert!(matches!(
            u8::convert_sql_value(&SqlValue::Int(256)),
            Err(TypeError::OutOfRange { .. })
        ));
        assert!(matches!(
            i32::convert_sql_value(&SqlValue::from("4x")),
            Err(TypeError::Parse { target: "i32", .. })
        ));
        assert_eq!(
            i64::convert_sql_value(&SqlValue::from(vec![1u8])).unwrap_err().to_string(),
            "Don't know how to convert 'binary' to i64"
        );
    }

    #[test]
    fn test_convert_bool() {
        assert!(bool::convert_sql_value(&SqlValue::from("TRUE")).unwrap());
        assert!(!bool::convert_sql_value(&SqlValue::from("0")).unwrap());
        assert!(bool::convert_sql_value(&SqlValue::Int(5)).unwrap());
        assert!(bool::convert_sql_value(&SqlValue::from("maybe")).is_err());
    }

    #[test]
    fn test_convert_string() {
        assert_eq!(String::convert_sql_value(&SqlValue::Int(5)).unwrap(), "5");
        assert_eq!(
            AnsiString::convert_sql_value(&SqlValue::Bool(true)).unwrap(),
            AnsiString("true".to_string())
        );
        assert!(String::convert_sql_value(&SqlValue::from(vec![1u8])).is_err());
    }

    #[test]
    fn test_binary() {
        let raw = SqlValue::from(vec![1u8, 2, 3]);
        assert_eq!(Vec::<u8>::from_sql_value(&raw).unwrap(), vec![1, 2, 3]);
        assert_eq!(Bytes::from_sql_value(&raw).unwrap(), Bytes::from_static(&[1, 2, 3]));
        assert_eq!(
            Vec::<u8>::convert_sql_value(&SqlValue::Int(1)).unwrap_err().to_string(),
            "Don't know how to convert 'int' to Vec<u8>"
        );
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_dates() {
        use chrono::{NaiveDate, NaiveDateTime};

        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let midnight = NaiveDateTime::from_sql_value(&SqlValue::Date(date)).unwrap();
        assert_eq!(midnight.date(), date);
        assert!(NaiveDate::from_sql_value(&SqlValue::DateTime(midnight)).is_err());
        assert_eq!(
            NaiveDate::convert_sql_value(&SqlValue::DateTime(midnight)).unwrap(),
            date
        );
        assert_eq!(
            NaiveDate::convert_sql_value(&SqlValue::from("2024-02-29")).unwrap(),
            date
        );
        assert_eq!(
            NaiveDateTime::convert_sql_value(&SqlValue::from("2024-02-29 00:00:00")).unwrap(),
            midnight
        );
    }

    #[cfg(feature = "uuid")]
    #[test]
    fn test_uuid() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(uuid::Uuid::from_sql_value(&SqlValue::Uuid(id)).unwrap(), id);
        assert_eq!(
            uuid::Uuid::convert_sql_value(&SqlValue::from(id.to_string())).unwrap(),
            id
        );
        assert_eq!(
            i32::convert_sql_value(&SqlValue::Uuid(id)).unwrap_err().to_string(),
            "Don't know how to convert 'uuid' to i32"
        );
    }
}
