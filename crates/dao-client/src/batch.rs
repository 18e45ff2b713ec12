//! Batch execution engine.
//!
//! One logical execution becomes N physical calls when input parameters
//! carry arrays of values. Before call `i`, every input array binds its
//! element `i` (one-element arrays bind their only element). After each
//! call of a non-query execution, every output-capable parameter appends
//! the driver's value to its captured outputs. Those outputs can then be
//! replayed row by row with
//! [`read_returned_params`](BatchExecutionEngine::read_returned_params).

use crate::driver::DriverParameter;
use crate::error::{Error, Result};
use crate::instrumentation::{OperationKind, SanitizationConfig};
use crate::registry::ParameterRegistry;

/// How a logical execution consumes its calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Outputs are captured by the engine after each call.
    NonQuery,
    /// Each call returns rows; the caller captures outputs once the rows of
    /// a call are consumed.
    Query,
    /// Like [`ExecutionMode::NonQuery`], for single-value results.
    Scalar,
}

impl ExecutionMode {
    /// Whether calls return rows.
    #[must_use]
    pub fn is_query(self) -> bool {
        matches!(self, Self::Query)
    }

    /// Operation kind used in log events.
    #[must_use]
    pub fn kind(self) -> OperationKind {
        match self {
            Self::NonQuery => OperationKind::NonQuery,
            Self::Query => OperationKind::Query,
            Self::Scalar => OperationKind::Scalar,
        }
    }
}

/// Batch-level hooks.
pub trait BatchHooks {
    /// Called once per logical execution, after every parameter has reset
    /// its per-batch state and before the first call.
    fn pre_on_execute(&mut self, calls: usize, is_query: bool) {
        let _ = (calls, is_query);
    }
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl BatchHooks for NoHooks {}

/// Fans logical executions out into physical calls.
#[derive(Debug)]
pub struct BatchExecutionEngine<H = NoHooks> {
    statement: String,
    hooks: H,
}

impl BatchExecutionEngine<NoHooks> {
    /// Create an engine for `command_text`, used in log events.
    #[must_use]
    pub fn new(command_text: impl Into<String>) -> Self {
        Self {
            statement: command_text.into(),
            hooks: NoHooks,
        }
    }
}

impl<H: BatchHooks> BatchExecutionEngine<H> {
    /// Replace the batch-level hooks.
    #[must_use]
    pub fn with_hooks<H2: BatchHooks>(self, hooks: H2) -> BatchExecutionEngine<H2> {
        BatchExecutionEngine {
            statement: self.statement,
            hooks,
        }
    }

    /// Sanitize the command text recorded in log events.
    #[must_use]
    pub fn sanitized(mut self, sanitization: &SanitizationConfig) -> Self {
        self.statement = sanitization.sanitize(&self.statement);
        self
    }

    /// Command text as it appears in log events.
    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// The batch-level hooks.
    #[must_use]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Run one logical execution, returning the number of calls made.
    ///
    /// `on_execute(i, registry)` performs physical call `i` with the values
    /// bound to the registry's handles. The first error aborts the remaining
    /// calls and is returned unchanged; calls already made keep their
    /// captured outputs.
    pub fn execute<P, F>(
        &mut self,
        registry: &mut ParameterRegistry<P>,
        mode: ExecutionMode,
        mut on_execute: F,
    ) -> Result<usize>
    where
        P: DriverParameter,
        F: FnMut(usize, &mut ParameterRegistry<P>) -> Result<()>,
    {
        let operation = mode.kind().as_str();
        let calls = registry.calls_required().map_err(|e| {
            tracing::error!(
                operation = operation,
                command = %self.statement,
                error = %e,
                "invalid parameter arrays"
            );
            Error::Validation(e)
        })?;
        let is_query = mode.is_query();

        let span = tracing::debug_span!("batch", operation = operation, calls = calls);
        let _enter = span.enter();

        for param in registry.iter_mut() {
            param.pre_on_execute(is_query, calls);
        }
        self.hooks.pre_on_execute(calls, is_query);

        for call_index in 0..calls {
            for param in registry.iter_mut() {
                param.pre_call(call_index);
            }

            if let Err(e) = on_execute(call_index, registry) {
                // Row errors are logged where they are raised.
                if matches!(e, Error::RowRead { .. }) {
                    return Err(e);
                }
                tracing::error!(
                    operation = operation,
                    command = %self.statement,
                    position = %no_of_calls_str(call_index + 1, calls, None),
                    error = %e,
                    "error executing command"
                );
                return Err(e);
            }

            if !is_query {
                for param in registry.iter_mut() {
                    param.post_call();
                }
            }

            tracing::trace!(call = call_index + 1, calls = calls, "call completed");
        }

        Ok(calls)
    }

    /// Replay captured outputs row by row.
    ///
    /// For each row `r` below the largest output count, every parameter
    /// with more than `r` captured outputs reads output `r`, then
    /// `on_read(r, registry)` runs. An error from `on_read` is wrapped in
    /// [`Error::RowRead`] with the row position and a parameter snapshot.
    pub fn read_returned_params<P, F>(
        &self,
        registry: &mut ParameterRegistry<P>,
        mut on_read: F,
    ) -> Result<()>
    where
        P: DriverParameter,
        F: FnMut(usize, &ParameterRegistry<P>) -> Result<()>,
    {
        let rows = registry.max_output_array_size();

        for row in 0..rows {
            for param in registry.iter_mut() {
                if param.output_array_size() > row {
                    param.set_read_index(row);
                }
            }

            if let Err(e) = on_read(row, registry) {
                let position = no_of_calls_str(0, 0, Some(row));
                let parameters = registry.for_log();
                tracing::error!(
                    command = %self.statement,
                    position = %position,
                    parameters = %parameters,
                    error = %e,
                    "error reading returned parameters"
                );
                return Err(Error::row_read(position, parameters, e));
            }
        }

        Ok(())
    }
}

/// Describe a position within a batch.
///
/// `""` for a single call outside of a row, `"2 of 5 calls"` within a
/// batch, `"row 3"` for a row, and `"row 3; 2 of 5 calls"` for both.
///
/// ```
/// use dao_client::batch::no_of_calls_str;
///
/// assert_eq!(no_of_calls_str(1, 1, None), "");
/// assert_eq!(no_of_calls_str(2, 5, Some(3)), "row 3; 2 of 5 calls");
/// ```
#[must_use]
pub fn no_of_calls_str(call_index: usize, total_calls: usize, row_index: Option<usize>) -> String {
    let calls = (total_calls > 1).then(|| format!("{call_index} of {total_calls} calls"));

    match (row_index, calls) {
        (None, None) => String::new(),
        (None, Some(calls)) => calls,
        (Some(row), None) => format!("row {row}"),
        (Some(row), Some(calls)) => format!("row {row}; {calls}"),
    }
}
