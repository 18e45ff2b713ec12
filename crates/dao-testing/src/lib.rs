//! # dao-testing
//!
//! Test infrastructure for sqldao.
//!
//! [`MockDriver`] implements the driver traits in memory. Each physical call
//! is recorded with the input values bound at the time, then handed to a
//! caller-supplied closure that decides what the call returns and may write
//! output values to the parameter handles.
//!
//! Tests that need a driver live in this crate to avoid a circular
//! dev-dependency with `dao-client`.

#![warn(missing_docs)]
#![deny(unsafe_code)]

use dao_client::{Driver, DriverParameter, RowCursor};
use dao_types::{DbType, ParameterDirection, SqlValue};
use thiserror::Error;

/// Error raised by the mock driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("mock driver error: {0}")]
pub struct MockError(pub String);

impl MockError {
    /// Create an error with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// In-memory parameter handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockParam {
    /// Name, prefix included.
    pub name: String,
    /// Direction.
    pub direction: ParameterDirection,
    /// Declared capacity.
    pub size: usize,
    /// Driver type hint.
    pub db_type: DbType,
    /// Current value.
    pub value: SqlValue,
}

impl DriverParameter for MockParam {
    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn set_direction(&mut self, direction: ParameterDirection) {
        self.direction = direction;
    }

    fn set_size(&mut self, size: usize) {
        self.size = size;
    }

    fn set_db_type(&mut self, db_type: DbType) {
        self.db_type = db_type;
    }

    fn value(&self) -> SqlValue {
        self.value.clone()
    }

    fn set_value(&mut self, value: SqlValue) {
        self.value = value;
    }
}

/// The handle called `name` (prefix included), ignoring case.
pub fn param<'a>(params: &'a mut [&mut MockParam], name: &str) -> Option<&'a mut MockParam> {
    params
        .iter_mut()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .map(|p| &mut **p)
}

/// In-memory rows.
#[derive(Debug, Clone, Default)]
pub struct MockRows {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
    position: Option<usize>,
    fail_at: Option<usize>,
}

impl MockRows {
    /// Rows with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Append a row.
    #[must_use]
    pub fn row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    /// Fail when advancing onto row `index`.
    #[must_use]
    pub fn fail_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    fn current(&self) -> Option<&Vec<SqlValue>> {
        self.position.and_then(|p| self.rows.get(p))
    }
}

impl RowCursor for MockRows {
    type Error = MockError;

    fn advance(&mut self) -> Result<bool, MockError> {
        let next = self.position.map_or(0, |p| p + 1);
        if self.fail_at == Some(next) {
            return Err(MockError::new(format!("cursor failed at row {next}")));
        }
        if next < self.rows.len() {
            self.position = Some(next);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn field_count(&self) -> usize {
        self.columns.len()
    }

    fn field_name(&self, ordinal: usize) -> String {
        self.columns.get(ordinal).cloned().unwrap_or_default()
    }

    fn is_null(&self, ordinal: usize) -> bool {
        self.current()
            .and_then(|row| row.get(ordinal))
            .is_none_or(SqlValue::is_null)
    }

    fn value(&self, ordinal: usize) -> SqlValue {
        self.current()
            .and_then(|row| row.get(ordinal))
            .cloned()
            .unwrap_or_default()
    }
}

/// What one mock call returns.
#[derive(Debug, Clone, Default)]
pub struct MockResponse {
    /// Affected rows, for non-queries.
    pub affected: u64,
    /// Rows, for readers.
    pub rows: MockRows,
    /// Value, for scalars.
    pub scalar: SqlValue,
}

impl MockResponse {
    /// A non-query response.
    pub fn affected(affected: u64) -> Self {
        Self {
            affected,
            ..Self::default()
        }
    }

    /// A reader response.
    pub fn rows(rows: MockRows) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// A scalar response.
    pub fn scalar(value: impl Into<SqlValue>) -> Self {
        Self {
            scalar: value.into(),
            ..Self::default()
        }
    }
}

/// A physical call as seen by the mock driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// `non-query`, `reader` or `scalar`.
    pub kind: &'static str,
    /// Every handle's name and value when the call was made.
    pub inputs: Vec<(String, SqlValue)>,
}

impl RecordedCall {
    /// Value bound to the handle called `name` (prefix included).
    #[must_use]
    pub fn input(&self, name: &str) -> Option<&SqlValue> {
        self.inputs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }
}

type Handler = Box<dyn FnMut(usize, &mut [&mut MockParam]) -> Result<MockResponse, MockError> + Send>;

/// In-memory driver.
pub struct MockDriver {
    command_text: String,
    handler: Handler,
    calls: Vec<RecordedCall>,
    created: usize,
}

impl MockDriver {
    /// A driver whose calls succeed with an empty response.
    pub fn new(command_text: impl Into<String>) -> Self {
        Self {
            command_text: command_text.into(),
            handler: Box::new(|_, _| Ok(MockResponse::default())),
            calls: Vec::new(),
            created: 0,
        }
    }

    /// Decide the outcome of each call.
    ///
    /// The closure receives the index of the call among all calls made on
    /// this driver, and the parameter handles.
    #[must_use]
    pub fn on_call<F>(mut self, handler: F) -> Self
    where
        F: FnMut(usize, &mut [&mut MockParam]) -> Result<MockResponse, MockError> + Send + 'static,
    {
        self.handler = Box::new(handler);
        self
    }

    /// Calls made so far.
    #[must_use]
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Number of parameter handles created.
    #[must_use]
    pub fn created_parameters(&self) -> usize {
        self.created
    }

    fn run(&mut self, kind: &'static str, params: &mut [&mut MockParam]) -> Result<MockResponse, MockError> {
        let index = self.calls.len();
        self.calls.push(RecordedCall {
            kind,
            inputs: params
                .iter()
                .map(|p| (p.name.clone(), p.value.clone()))
                .collect(),
        });
        tracing::trace!(kind = kind, call = index, "mock call");
        (self.handler)(index, params)
    }
}

impl Driver for MockDriver {
    type Param = MockParam;
    type Rows = MockRows;
    type Error = MockError;

    fn create_parameter(&mut self) -> MockParam {
        self.created += 1;
        MockParam::default()
    }

    fn command_text(&self) -> &str {
        &self.command_text
    }

    fn execute_non_query(&mut self, params: &mut [&mut MockParam]) -> Result<u64, MockError> {
        self.run("non-query", params).map(|r| r.affected)
    }

    fn execute_reader(&mut self, params: &mut [&mut MockParam]) -> Result<MockRows, MockError> {
        self.run("reader", params).map(|r| r.rows)
    }

    fn execute_scalar(&mut self, params: &mut [&mut MockParam]) -> Result<SqlValue, MockError> {
        self.run("scalar", params).map(|r| r.scalar)
    }
}

impl std::fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDriver")
            .field("command_text", &self.command_text)
            .field("calls", &self.calls.len())
            .finish()
    }
}

/// Install a test-friendly tracing subscriber. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
