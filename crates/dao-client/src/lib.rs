//! # dao-client
//!
//! Parameter handling and batch execution on top of a SQL command driver.
//!
//! This crate does not talk to a database. It sits between application code
//! and a [`Driver`] and takes care of:
//!
//! - **Parameters**: declared once per command, with scalar or per-call
//!   array input, captured output and a read index for replaying outputs
//! - **Validation**: declared parameters are checked against the parameter
//!   references found in the command text before the first execution
//! - **Batching**: array-bound input fans one logical execution out into
//!   one physical call per array element
//! - **Typed reads**: result columns and output parameters read through
//!   the null-aware projections of `dao-types`
//!
//! ## Example
//!
//! ```rust,ignore
//! use dao_client::{DaoCommand, DaoConfig};
//!
//! let mut cmd = DaoCommand::new(driver, DaoConfig::default());
//! cmd.add_input_values("id", [1, 2, 3])?;
//! cmd.add_input("status", "active")?;
//!
//! // Three physical calls, one per id.
//! let affected = cmd.execute_non_query()?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod batch;
pub mod command;
pub mod config;
pub mod connection;
pub mod driver;
pub mod error;
pub mod instrumentation;
pub mod parameter;
pub mod read;
pub mod registry;
pub mod scan_cache;

// Re-export commonly used types
pub use batch::{BatchExecutionEngine, BatchHooks, ExecutionMode, NoHooks, no_of_calls_str};
pub use command::DaoCommand;
pub use config::DaoConfig;
pub use connection::DeferredConnection;
pub use dao_sql::{ValidationError, ValidationReport};
pub use dao_types::{
    DbType, FromSqlValue, ParameterDirection, SqlValue, TypeError, TypedValue, ValueSource,
};
pub use driver::{Driver, DriverParameter, RowCursor};
pub use error::{BoxError, Error, Result};
pub use parameter::{DaoParameter, InputValue};
pub use read::{ColumnValue, RowReader};
pub use registry::ParameterRegistry;
pub use scan_cache::ScanCache;
