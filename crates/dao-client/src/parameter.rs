//! Command parameters and their value storage.
//!
//! A [`DaoParameter`] owns its driver handle and keeps three kinds of value:
//!
//! - the input the caller bound, either one scalar or one value per call;
//! - the output captured from the handle after each call;
//! - a read index selecting which captured output reads serve.
//!
//! Reads with no read index, or an index past the captured outputs, fall
//! back to the value currently held by the driver handle.

use dao_sql::ParameterDecl;
use dao_types::{DbType, FromSqlValue, ParameterDirection, SqlValue, TypeError, TypedValue, ValueSource};

use crate::driver::DriverParameter;

/// Input bound by the caller.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputValue {
    /// Nothing bound yet.
    #[default]
    Unset,
    /// One value, shared by every call.
    Scalar(SqlValue),
    /// One value per call. A one-element array is shared by every call.
    Array(Vec<SqlValue>),
}

impl InputValue {
    /// Value to bind for the call at `call_index`.
    ///
    /// Arrays bind element `call_index`, or element 0 when they hold exactly
    /// one value. Empty or too-short arrays bind NULL. Scalars and unset
    /// inputs have nothing to bind per call.
    #[must_use]
    pub fn for_call(&self, call_index: usize) -> Option<SqlValue> {
        match self {
            Self::Unset | Self::Scalar(_) => None,
            Self::Array(values) if values.len() == 1 => Some(values[0].clone()),
            Self::Array(values) => Some(values.get(call_index).cloned().unwrap_or_default()),
        }
    }

    /// Number of array values, 0 for scalars.
    #[must_use]
    pub fn array_size(&self) -> usize {
        match self {
            Self::Array(values) => values.len(),
            Self::Unset | Self::Scalar(_) => 0,
        }
    }
}

/// A parameter attached to a command.
#[derive(Debug)]
pub struct DaoParameter<P> {
    name: String,
    direction: ParameterDirection,
    db_type: DbType,
    size: usize,
    input: InputValue,
    output_values: Vec<SqlValue>,
    read_index: Option<usize>,
    handle: P,
}

impl<P: DriverParameter> DaoParameter<P> {
    /// Attach `handle` as the parameter `name`, written to the driver with
    /// `prefix` in front.
    pub fn new(name: impl Into<String>, direction: ParameterDirection, prefix: &str, mut handle: P) -> Self {
        let name = name.into();
        handle.set_name(&format!("{prefix}{name}"));
        handle.set_direction(direction);

        Self {
            name,
            direction,
            db_type: DbType::default(),
            size: 0,
            input: InputValue::Unset,
            output_values: Vec::new(),
            read_index: None,
            handle,
        }
    }

    /// Parameter name, without prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter direction.
    #[must_use]
    pub fn direction(&self) -> ParameterDirection {
        self.direction
    }

    /// Driver type hint.
    #[must_use]
    pub fn db_type(&self) -> DbType {
        self.db_type
    }

    /// Declared capacity.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Set the driver type hint.
    pub fn set_db_type(&mut self, db_type: DbType) -> &mut Self {
        self.db_type = db_type;
        self.handle.set_db_type(db_type);
        self
    }

    /// Set the declared capacity.
    pub fn set_size(&mut self, size: usize) -> &mut Self {
        self.size = size;
        self.handle.set_size(size);
        self
    }

    /// Bind a scalar input, replacing any array input.
    ///
    /// The value reaches the driver handle immediately.
    pub fn set_value(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        let value = value.into();
        self.handle.set_value(value.clone());
        self.input = InputValue::Scalar(value);
        self
    }

    /// Bind one input value per call, replacing any scalar input.
    pub fn set_values<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<SqlValue>,
    {
        self.input = InputValue::Array(values.into_iter().map(Into::into).collect());
        self
    }

    /// [`DaoParameter::set_values`], with `None` binding an empty array.
    pub fn set_values_opt<I>(&mut self, values: Option<I>) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<SqlValue>,
    {
        match values {
            Some(values) => self.set_values(values),
            None => {
                self.input = InputValue::Array(Vec::new());
                self
            }
        }
    }

    /// The bound input.
    #[must_use]
    pub fn input(&self) -> &InputValue {
        &self.input
    }

    /// Number of array input values, 0 when the input is scalar.
    #[must_use]
    pub fn input_array_size(&self) -> usize {
        self.input.array_size()
    }

    /// Number of captured outputs.
    #[must_use]
    pub fn output_array_size(&self) -> usize {
        self.output_values.len()
    }

    /// Captured outputs, one per call.
    #[must_use]
    pub fn output_values(&self) -> &[SqlValue] {
        &self.output_values
    }

    /// Reset per-batch state before a logical execution of `calls` calls.
    pub fn pre_on_execute(&mut self, _is_query: bool, calls: usize) {
        self.output_values.clear();
        if self.direction.accepts_output() {
            self.output_values.reserve(calls);
        }
        self.read_index = None;
    }

    /// Bind the input for the call at `call_index`.
    pub fn pre_call(&mut self, call_index: usize) {
        if !self.direction.accepts_input() {
            return;
        }
        if let Some(value) = self.input.for_call(call_index) {
            self.handle.set_value(value);
        }
    }

    /// Capture the driver's current value after a call.
    pub fn post_call(&mut self) {
        if self.direction.accepts_output() {
            self.output_values.push(self.handle.value());
        }
    }

    /// Serve reads from the output captured for call `index`.
    pub fn set_read_index(&mut self, index: usize) {
        self.read_index = Some(index);
    }

    /// Serve reads from the driver handle again.
    pub fn clear_read_index(&mut self) {
        self.read_index = None;
    }

    /// Current read index.
    #[must_use]
    pub fn read_index(&self) -> Option<usize> {
        self.read_index
    }

    /// The current value as a raw [`SqlValue`].
    #[must_use]
    pub fn value_as_object(&self) -> SqlValue {
        match self.read_index.and_then(|i| self.output_values.get(i)) {
            Some(value) => value.clone(),
            None => self.handle.value(),
        }
    }

    /// The current value as `T`, with NULL reading as `T`'s null default.
    pub fn value<T: FromSqlValue>(&self) -> Result<T, TypeError> {
        self.get()
    }

    /// Render the parameter for a log line: `@name dir = value`.
    #[must_use]
    pub fn for_log(&self, prefix: &str, include_value: bool, max_len: usize) -> String {
        let head = format!("{prefix}{} {}", self.name, self.direction.as_str());
        if !include_value {
            return head;
        }

        let rendered = match (&self.input, self.direction.accepts_input()) {
            (InputValue::Array(values), true) if self.read_index.is_none() => {
                let items: Vec<String> = values.iter().map(|v| v.for_log(max_len)).collect();
                format!("[{}]", items.join(", "))
            }
            _ => self.value_as_object().for_log(max_len),
        };
        format!("{head} = {rendered}")
    }

    /// The driver handle.
    #[must_use]
    pub fn handle(&self) -> &P {
        &self.handle
    }

    /// The driver handle, mutably.
    pub fn handle_mut(&mut self) -> &mut P {
        &mut self.handle
    }
}

impl<P> ParameterDecl for DaoParameter<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_array_size(&self) -> usize {
        self.input.array_size()
    }

    fn accepts_input(&self) -> bool {
        self.direction.accepts_input()
    }
}

impl<P: DriverParameter> ValueSource for DaoParameter<P> {
    fn is_null(&self) -> bool {
        self.value_as_object().is_null()
    }

    fn raw_value(&self) -> SqlValue {
        self.value_as_object()
    }
}
