//! Per-command parameter collection.

use std::collections::BTreeSet;

use dao_sql::{ValidationError, ValidationReport, array_size_conflicts, validate};
use dao_types::ParameterDirection;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::DEFAULT_PARAMETER_PREFIX;
use crate::driver::DriverParameter;
use crate::error::{Error, Result};
use crate::parameter::DaoParameter;

/// The parameters declared on one command, in declaration order.
///
/// Lookups by name are case-insensitive. Declaring the same name twice is
/// allowed here and reported by validation.
#[derive(Debug)]
pub struct ParameterRegistry<P> {
    params: Vec<DaoParameter<P>>,
    prefix: String,
    log_values: bool,
    max_logged_value_len: usize,
}

impl<P: DriverParameter> ParameterRegistry<P> {
    /// Create an empty registry for parameters introduced by `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            params: Vec::new(),
            prefix: prefix.into(),
            log_values: true,
            max_logged_value_len: 256,
        }
    }

    /// Control how [`ParameterRegistry::for_log`] renders values.
    #[must_use]
    pub fn with_logging(mut self, log_values: bool, max_logged_value_len: usize) -> Self {
        self.log_values = log_values;
        self.max_logged_value_len = max_logged_value_len;
        self
    }

    /// Parameter prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Declare a parameter backed by `handle`.
    ///
    /// A leading prefix on `name` is dropped. The remaining name must be a
    /// valid identifier.
    pub fn add(
        &mut self,
        name: &str,
        direction: ParameterDirection,
        handle: P,
    ) -> Result<&mut DaoParameter<P>> {
        let name = name.strip_prefix(self.prefix.as_str()).unwrap_or(name);
        validate_identifier(name)?;

        let index = self.params.len();
        self.params
            .push(DaoParameter::new(name, direction, &self.prefix, handle));
        Ok(&mut self.params[index])
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameter is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &DaoParameter<P>> {
        self.params.iter()
    }

    /// Parameters in declaration order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut DaoParameter<P>> {
        self.params.iter_mut()
    }

    /// First parameter called `name`, ignoring case and an optional prefix.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DaoParameter<P>> {
        let name = name.strip_prefix(self.prefix.as_str()).unwrap_or(name);
        let lowered = name.to_lowercase();
        self.params
            .iter()
            .find(|p| p.name().to_lowercase() == lowered)
    }

    /// Mutable variant of [`ParameterRegistry::get`].
    pub fn get_mut(&mut self, name: &str) -> Option<&mut DaoParameter<P>> {
        let name = name.strip_prefix(self.prefix.as_str()).unwrap_or(name);
        let lowered = name.to_lowercase();
        self.params
            .iter_mut()
            .find(|p| p.name().to_lowercase() == lowered)
    }

    /// Driver handles of every parameter, in declaration order.
    pub fn handles_mut(&mut self) -> Vec<&mut P> {
        self.params.iter_mut().map(DaoParameter::handle_mut).collect()
    }

    /// Number of physical calls one logical execution needs.
    ///
    /// Input arrays of size 0 or 1 are broadcast to every call. All larger
    /// input arrays must agree in size; that size is the call count.
    pub fn calls_required(&self) -> std::result::Result<usize, ValidationError> {
        let conflicts = array_size_conflicts(&self.params);
        if !conflicts.is_empty() {
            return Err(ValidationError::new(ValidationReport {
                array_size_mismatch: conflicts,
                ..ValidationReport::default()
            }));
        }

        let sizes: BTreeSet<usize> = self
            .params
            .iter()
            .filter(|p| p.direction().accepts_input())
            .map(DaoParameter::input_array_size)
            .filter(|&size| size > 1)
            .collect();
        Ok(sizes.last().copied().unwrap_or(1))
    }

    /// Largest number of captured outputs among the parameters.
    #[must_use]
    pub fn max_output_array_size(&self) -> usize {
        self.params
            .iter()
            .map(DaoParameter::output_array_size)
            .max()
            .unwrap_or(0)
    }

    /// Validate the declared parameters against referenced names.
    #[must_use]
    pub fn validate_against<S: AsRef<str>>(&self, referenced: &[S]) -> ValidationReport {
        validate(&self.params, referenced)
    }

    /// Snapshot of every parameter for log lines and error context.
    #[must_use]
    pub fn for_log(&self) -> String {
        self.params
            .iter()
            .map(|p| p.for_log(&self.prefix, self.log_values, self.max_logged_value_len))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<P: DriverParameter> Default for ParameterRegistry<P> {
    fn default() -> Self {
        Self::new(DEFAULT_PARAMETER_PREFIX)
    }
}

/// Validate a parameter name.
///
/// Names may only contain characters that can follow a prefix in command
/// text: letters, digits and `_`, up to 128 of them.
pub fn validate_identifier(name: &str) -> Result<()> {
    #[allow(clippy::expect_used)]
    static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^[\p{Alphabetic}\p{N}_]{1,128}$").expect("identifier pattern is valid")
    });

    if name.is_empty() {
        return Err(Error::InvalidIdentifier(
            "identifier cannot be empty".into(),
        ));
    }

    if !IDENTIFIER_RE.is_match(name) {
        return Err(Error::InvalidIdentifier(format!(
            "invalid identifier '{name}': must contain only letters, digits or '_' \
             and be 1-128 characters"
        )));
    }

    Ok(())
}
