//! # dao-types
//!
//! Values exchanged with the driver, and the null-aware typed read layer
//! built on top of them.
//!
//! - [`SqlValue`] is the raw value of a result column or a driver parameter.
//! - [`FromSqlValue`] projects a raw value onto a Rust type, with one entry
//!   per supported primitive instead of one method per type.
//! - [`ValueSource`] and [`TypedValue`] give any "is it null / what is it"
//!   pair of accessors the full set of typed reads.
//! - [`convert_value`] is the lenient conversion used where a value of one
//!   type has to become another (scalar results, loosely typed settings).
//!
//! ## Example
//!
//! ```
//! use dao_types::{SqlValue, TypedValue, convert_value};
//!
//! let raw = SqlValue::SmallInt(7);
//! let wide: i64 = raw.get().unwrap();
//! assert_eq!(wide, 7);
//!
//! let parsed: i32 = convert_value(&SqlValue::from("42"), 0).unwrap();
//! assert_eq!(parsed, 42);
//!
//! let missing: Option<i32> = SqlValue::Null.get().unwrap();
//! assert_eq!(missing, None);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod convert;
pub mod error;
pub mod from_sql;
pub mod typed;
pub mod value;

pub use convert::{convert_value, convert_value_or_default};
pub use error::TypeError;
pub use from_sql::FromSqlValue;
pub use typed::{FnValue, ReaderCache, TypedReader, TypedValue, ValueSource};
pub use value::{AnsiString, DbType, ParameterDirection, SqlValue};

#[cfg(feature = "decimal")]
pub use rust_decimal::Decimal;
