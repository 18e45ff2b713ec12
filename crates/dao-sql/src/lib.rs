//! # dao-sql
//!
//! SQL text scanning and parameter validation.
//!
//! This crate knows nothing about drivers or values. It answers two
//! questions about a command before it is executed:
//!
//! - which parameter placeholders does the SQL text actually reference,
//!   ignoring anything inside comments and quoted literals?
//! - do the declared parameters agree with those references, and with each
//!   other's array sizes?
//!
//! ## Example
//!
//! ```
//! use dao_sql::scanner::extract_parameter_names;
//!
//! let sql = "SELECT * FROM users -- @ignored\nWHERE id = @id AND name <> '@nope'";
//! assert_eq!(extract_parameter_names(sql, "@"), vec!["id".to_string()]);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod scanner;
pub mod validator;

pub use error::ValidationError;
pub use scanner::{extract_parameter_names, scan_parameter_tokens, strip};
pub use validator::{ParameterDecl, ValidationReport, array_size_conflicts, validate};
