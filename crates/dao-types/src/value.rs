//! Raw driver values and parameter metadata.

use std::fmt;

use bytes::Bytes;

/// A raw value as held by the driver: a result column, a parameter's bound
/// input, or a parameter's captured output.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SqlValue {
    /// SQL NULL.
    #[default]
    Null,
    /// BIT.
    Bool(bool),
    /// TINYINT (unsigned 8-bit).
    TinyInt(u8),
    /// SMALLINT.
    SmallInt(i16),
    /// INT.
    Int(i32),
    /// BIGINT.
    BigInt(i64),
    /// REAL.
    Float(f32),
    /// FLOAT / DOUBLE PRECISION.
    Double(f64),
    /// DECIMAL / NUMERIC.
    #[cfg(feature = "decimal")]
    Decimal(rust_decimal::Decimal),
    /// Character data, national or ANSI.
    String(String),
    /// Binary data.
    Binary(Bytes),
    /// DATE.
    #[cfg(feature = "chrono")]
    Date(chrono::NaiveDate),
    /// TIME.
    #[cfg(feature = "chrono")]
    Time(chrono::NaiveTime),
    /// DATETIME / DATETIME2 / TIMESTAMP.
    #[cfg(feature = "chrono")]
    DateTime(chrono::NaiveDateTime),
    /// UNIQUEIDENTIFIER / UUID.
    #[cfg(feature = "uuid")]
    Uuid(uuid::Uuid),
}

impl SqlValue {
    /// Whether this value is SQL NULL.
    ///
    /// Only [`SqlValue::Null`] is null; an empty string or a zero is a value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short label of the value's type, used in conversion messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::TinyInt(_) => "tinyint",
            Self::SmallInt(_) => "smallint",
            Self::Int(_) => "int",
            Self::BigInt(_) => "bigint",
            Self::Float(_) => "real",
            Self::Double(_) => "float",
            #[cfg(feature = "decimal")]
            Self::Decimal(_) => "decimal",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
            #[cfg(feature = "chrono")]
            Self::Date(_) => "date",
            #[cfg(feature = "chrono")]
            Self::Time(_) => "time",
            #[cfg(feature = "chrono")]
            Self::DateTime(_) => "datetime",
            #[cfg(feature = "uuid")]
            Self::Uuid(_) => "uuid",
        }
    }

    /// The driver type a parameter bound to this value would default to.
    #[must_use]
    pub fn db_type(&self) -> DbType {
        match self {
            Self::Null => DbType::Object,
            Self::Bool(_) => DbType::Boolean,
            Self::TinyInt(_) => DbType::Byte,
            Self::SmallInt(_) => DbType::Int16,
            Self::Int(_) => DbType::Int32,
            Self::BigInt(_) => DbType::Int64,
            Self::Float(_) => DbType::Single,
            Self::Double(_) => DbType::Double,
            #[cfg(feature = "decimal")]
            Self::Decimal(_) => DbType::Decimal,
            Self::String(_) => DbType::String,
            Self::Binary(_) => DbType::Binary,
            #[cfg(feature = "chrono")]
            Self::Date(_) => DbType::Date,
            #[cfg(feature = "chrono")]
            Self::Time(_) => DbType::Time,
            #[cfg(feature = "chrono")]
            Self::DateTime(_) => DbType::DateTime,
            #[cfg(feature = "uuid")]
            Self::Uuid(_) => DbType::Guid,
        }
    }

    /// Render the value for a log line: strings quoted, long values cut at
    /// `max_len` characters.
    #[must_use]
    pub fn for_log(&self, max_len: usize) -> String {
        let rendered = match self {
            Self::String(s) => format!("'{s}'"),
            other => other.to_string(),
        };

        if rendered.chars().count() <= max_len {
            rendered
        } else {
            let cut: String = rendered.chars().take(max_len.saturating_sub(3)).collect();
            format!("{cut}...")
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::TinyInt(v) => write!(f, "{v}"),
            Self::SmallInt(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::BigInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            #[cfg(feature = "decimal")]
            Self::Decimal(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Binary(v) => {
                f.write_str("0x")?;
                for byte in v.iter() {
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            }
            #[cfg(feature = "chrono")]
            Self::Date(v) => write!(f, "{v}"),
            #[cfg(feature = "chrono")]
            Self::Time(v) => write!(f, "{v}"),
            #[cfg(feature = "chrono")]
            Self::DateTime(v) => write!(f, "{v}"),
            #[cfg(feature = "uuid")]
            Self::Uuid(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_for_sql_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_from_for_sql_value! {
    bool => Bool,
    u8 => TinyInt,
    i8 => SmallInt,
    i16 => SmallInt,
    u16 => Int,
    i32 => Int,
    u32 => BigInt,
    i64 => BigInt,
    f32 => Float,
    f64 => Double,
    String => String,
    &str => String,
    Bytes => Binary,
    Vec<u8> => Binary,
}

#[cfg(feature = "decimal")]
impl_from_for_sql_value! {
    rust_decimal::Decimal => Decimal,
    u64 => Decimal,
}

#[cfg(feature = "chrono")]
impl_from_for_sql_value! {
    chrono::NaiveDate => Date,
    chrono::NaiveTime => Time,
    chrono::NaiveDateTime => DateTime,
}

#[cfg(feature = "uuid")]
impl_from_for_sql_value! {
    uuid::Uuid => Uuid,
}

impl From<&[u8]> for SqlValue {
    fn from(value: &[u8]) -> Self {
        Self::Binary(Bytes::copy_from_slice(value))
    }
}

impl From<AnsiString> for SqlValue {
    fn from(value: AnsiString) -> Self {
        Self::String(value.0)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Character data meant for a non-Unicode (VARCHAR) column.
///
/// Reads the same as `String`; the distinction matters only for the driver
/// type a parameter is declared with ([`DbType::AnsiString`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AnsiString(pub String);

impl fmt::Display for AnsiString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Driver type hint attached to a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DbType {
    /// Let the driver infer the type from the value.
    #[default]
    Object,
    /// Non-Unicode character data.
    AnsiString,
    /// Unicode character data.
    String,
    /// Binary data.
    Binary,
    /// Boolean.
    Boolean,
    /// Unsigned 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Single-precision float.
    Single,
    /// Double-precision float.
    Double,
    /// Exact numeric.
    Decimal,
    /// Date without time.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    DateTime,
    /// Globally unique identifier.
    Guid,
}

/// Direction of a command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterDirection {
    /// Value flows to the server only.
    #[default]
    Input,
    /// Value flows back from the server only.
    Output,
    /// Value flows both ways.
    InputOutput,
    /// Stored procedure return value.
    ReturnValue,
}

impl ParameterDirection {
    /// Whether a value is bound before each call.
    #[must_use]
    pub fn accepts_input(self) -> bool {
        matches!(self, Self::Input | Self::InputOutput)
    }

    /// Whether a value is captured after each call.
    #[must_use]
    pub fn accepts_output(self) -> bool {
        matches!(self, Self::Output | Self::InputOutput | Self::ReturnValue)
    }

    /// Short label used in log lines.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "in",
            Self::Output => "out",
            Self::InputOutput => "inout",
            Self::ReturnValue => "return",
        }
    }
}
