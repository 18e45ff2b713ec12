//! Lenient value conversion.

use crate::error::TypeError;
use crate::from_sql::FromSqlValue;
use crate::value::SqlValue;

/// Convert a raw value to `T`, returning `default` for NULL.
///
/// A value that already is a `T`, or widens to one without loss, is returned
/// as-is. Otherwise a parse-like conversion is attempted (text to number,
/// number to text, float to integer with rounding and range checks). When no
/// path exists the error reads `Don't know how to convert '<source>' to <T>`.
///
/// Failures are logged with the offending value and the target type, then
/// returned unchanged.
///
/// # Example
///
/// ```
/// use dao_types::{SqlValue, convert_value};
///
/// assert_eq!(convert_value::<i32>(&SqlValue::from("42"), 0).unwrap(), 42);
/// assert_eq!(convert_value::<i32>(&SqlValue::Null, 7).unwrap(), 7);
/// ```
pub fn convert_value<T: FromSqlValue>(value: &SqlValue, default: T) -> Result<T, TypeError> {
    if value.is_null() {
        return Ok(default);
    }

    T::convert_sql_value(value).inspect_err(|e| {
        tracing::error!(
            value = %value.for_log(256),
            source_type = value.type_name(),
            target = T::TARGET,
            error = %e,
            "error converting value"
        );
    })
}

/// [`convert_value`] with the type's own null default.
pub fn convert_value_or_default<T: FromSqlValue>(value: &SqlValue) -> Result<T, TypeError> {
    convert_value(value, T::null_default())
}
