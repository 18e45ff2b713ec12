//! Fuzz target for lenient value conversion.
//!
//! Conversion of arbitrary values to every supported type must return a
//! value or an error, never panic.

#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use dao_types::{SqlValue, convert_value_or_default};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum RawValue {
    Null,
    Bool(bool),
    TinyInt(u8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    String(String),
    Binary(Vec<u8>),
}

impl From<RawValue> for SqlValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Null => SqlValue::Null,
            RawValue::Bool(v) => SqlValue::Bool(v),
            RawValue::TinyInt(v) => SqlValue::TinyInt(v),
            RawValue::SmallInt(v) => SqlValue::SmallInt(v),
            RawValue::Int(v) => SqlValue::Int(v),
            RawValue::BigInt(v) => SqlValue::BigInt(v),
            RawValue::Float(v) => SqlValue::Float(v),
            RawValue::Double(v) => SqlValue::Double(v),
            RawValue::String(v) => SqlValue::String(v),
            RawValue::Binary(v) => SqlValue::Binary(Bytes::from(v)),
        }
    }
}

fuzz_target!(|raw: RawValue| {
    let value = SqlValue::from(raw);

    let _ = convert_value_or_default::<bool>(&value);
    let _ = convert_value_or_default::<u8>(&value);
    let _ = convert_value_or_default::<i8>(&value);
    let _ = convert_value_or_default::<i16>(&value);
    let _ = convert_value_or_default::<u16>(&value);
    let _ = convert_value_or_default::<i32>(&value);
    let _ = convert_value_or_default::<u32>(&value);
    let _ = convert_value_or_default::<i64>(&value);
    let _ = convert_value_or_default::<u64>(&value);
    let _ = convert_value_or_default::<f32>(&value);
    let _ = convert_value_or_default::<f64>(&value);
    let _ = convert_value_or_default::<String>(&value);
    let _ = convert_value_or_default::<Vec<u8>>(&value);
    let _ = convert_value_or_default::<dao_types::Decimal>(&value);
    let _ = convert_value_or_default::<chrono::NaiveDateTime>(&value);
    let _ = convert_value_or_default::<uuid::Uuid>(&value);

    if let Ok(exact) = convert_value_or_default::<Option<i64>>(&SqlValue::BigInt(7)) {
        assert_eq!(exact, Some(7));
    }
});
