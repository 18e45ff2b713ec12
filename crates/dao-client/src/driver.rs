//! Driver collaborator traits.
//!
//! The client never talks to a database itself. A [`Driver`] runs one
//! physical call at a time against whatever connection it wraps, reading
//! input values from and writing output values to its own parameter handles.

use dao_types::{DbType, ParameterDirection, SqlValue};

use crate::error::BoxError;

/// A driver-side parameter handle.
pub trait DriverParameter {
    /// Set the parameter name, prefix included.
    fn set_name(&mut self, name: &str);

    /// Set the parameter direction.
    fn set_direction(&mut self, direction: ParameterDirection);

    /// Set the declared capacity.
    fn set_size(&mut self, size: usize);

    /// Set the driver type hint.
    fn set_db_type(&mut self, db_type: DbType);

    /// The value currently held by the handle.
    fn value(&self) -> SqlValue;

    /// Bind a value to the handle.
    fn set_value(&mut self, value: SqlValue);
}

/// A forward-only cursor over the rows of a result.
pub trait RowCursor {
    /// Error raised while advancing.
    type Error: Into<BoxError>;

    /// Move to the next row. Returns `false` once the rows are exhausted.
    fn advance(&mut self) -> Result<bool, Self::Error>;

    /// Number of columns in each row.
    fn field_count(&self) -> usize;

    /// Name of the column at `ordinal`.
    fn field_name(&self, ordinal: usize) -> String;

    /// Whether the column at `ordinal` of the current row is NULL.
    fn is_null(&self, ordinal: usize) -> bool;

    /// Raw value of the column at `ordinal` of the current row.
    fn value(&self, ordinal: usize) -> SqlValue;
}

/// A command bound to a connection.
///
/// Each `execute_*` method performs exactly one physical call with the
/// values currently bound to `params`. Output values are written back to
/// the handles; for readers they must be readable once the returned rows
/// have been consumed.
pub trait Driver {
    /// Parameter handle type.
    type Param: DriverParameter;
    /// Row cursor type.
    type Rows: RowCursor;
    /// Error raised by a call.
    type Error: Into<BoxError>;

    /// Create an unbound parameter handle.
    fn create_parameter(&mut self) -> Self::Param;

    /// Command text, used for diagnostics.
    fn command_text(&self) -> &str;

    /// Run the command, returning the number of affected rows.
    fn execute_non_query(&mut self, params: &mut [&mut Self::Param]) -> Result<u64, Self::Error>;

    /// Run the command, returning its rows.
    fn execute_reader(&mut self, params: &mut [&mut Self::Param]) -> Result<Self::Rows, Self::Error>;

    /// Run the command, returning the first column of the first row.
    fn execute_scalar(&mut self, params: &mut [&mut Self::Param]) -> Result<SqlValue, Self::Error>;
}
