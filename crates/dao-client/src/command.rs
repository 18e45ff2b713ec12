//! Command facade.
//!
//! [`DaoCommand`] ties a [`Driver`] to a parameter registry and a batch
//! engine: parameters are declared on it, validated once against the
//! command text, and every `execute_*` call runs as one logical execution.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

use dao_types::{DbType, FromSqlValue, ParameterDirection, SqlValue, convert_value_or_default};

use crate::batch::{BatchExecutionEngine, BatchHooks, ExecutionMode, NoHooks, no_of_calls_str};
use crate::config::DaoConfig;
use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::instrumentation::{SanitizationConfig, extract_operation};
use crate::parameter::DaoParameter;
use crate::read::RowReader;
use crate::registry::ParameterRegistry;
use crate::scan_cache::ScanCache;

/// A command with declared parameters, ready to execute.
pub struct DaoCommand<D: Driver, H = NoHooks> {
    driver: D,
    config: DaoConfig,
    registry: ParameterRegistry<D::Param>,
    engine: BatchExecutionEngine<H>,
    validated: bool,
}

impl<D: Driver> DaoCommand<D, NoHooks> {
    /// Wrap `driver` using `config`.
    pub fn new(driver: D, config: DaoConfig) -> Self {
        let registry = ParameterRegistry::new(config.parameter_prefix.clone())
            .with_logging(config.log_parameter_values, config.max_logged_value_len);
        let engine = BatchExecutionEngine::new(driver.command_text())
            .sanitized(&SanitizationConfig::from_config(&config));

        Self {
            driver,
            config,
            registry,
            engine,
            validated: false,
        }
    }
}

impl<D, H> DaoCommand<D, H>
where
    D: Driver,
    D::Rows: 'static,
    H: BatchHooks,
{
    /// Replace the batch-level hooks.
    #[must_use]
    pub fn with_hooks<H2: BatchHooks>(self, hooks: H2) -> DaoCommand<D, H2> {
        DaoCommand {
            driver: self.driver,
            config: self.config,
            registry: self.registry,
            engine: self.engine.with_hooks(hooks),
            validated: self.validated,
        }
    }

    /// Command text.
    #[must_use]
    pub fn command_text(&self) -> &str {
        self.driver.command_text()
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &DaoConfig {
        &self.config
    }

    /// The driver.
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The driver, mutably.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// The batch-level hooks.
    #[must_use]
    pub fn hooks(&self) -> &H {
        self.engine.hooks()
    }

    /// Declared parameters.
    #[must_use]
    pub fn parameters(&self) -> &ParameterRegistry<D::Param> {
        &self.registry
    }

    /// Declared parameters, mutably.
    pub fn parameters_mut(&mut self) -> &mut ParameterRegistry<D::Param> {
        &mut self.registry
    }

    /// The parameter called `name`, ignoring case.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&DaoParameter<D::Param>> {
        self.registry.get(name)
    }

    fn declare(&mut self, name: &str, direction: ParameterDirection) -> Result<&mut DaoParameter<D::Param>> {
        let handle = self.driver.create_parameter();
        self.validated = false;
        self.registry.add(name, direction, handle)
    }

    /// Declare an input parameter bound to `value`.
    pub fn add_input(
        &mut self,
        name: &str,
        value: impl Into<SqlValue>,
    ) -> Result<&mut DaoParameter<D::Param>> {
        let value = value.into();
        let db_type = value.db_type();
        let param = self.declare(name, ParameterDirection::Input)?;
        param.set_db_type(db_type).set_value(value);
        Ok(param)
    }

    /// Declare an input parameter bound to one value per call.
    pub fn add_input_values<I>(&mut self, name: &str, values: I) -> Result<&mut DaoParameter<D::Param>>
    where
        I: IntoIterator,
        I::Item: Into<SqlValue>,
    {
        let values: Vec<SqlValue> = values.into_iter().map(Into::into).collect();
        let db_type = values
            .iter()
            .find(|v| !v.is_null())
            .map_or(DbType::Object, SqlValue::db_type);
        let param = self.declare(name, ParameterDirection::Input)?;
        param.set_db_type(db_type).set_values(values);
        Ok(param)
    }

    /// Declare an output parameter.
    pub fn add_output(&mut self, name: &str, db_type: DbType, size: usize) -> Result<&mut DaoParameter<D::Param>> {
        let param = self.declare(name, ParameterDirection::Output)?;
        param.set_db_type(db_type).set_size(size);
        Ok(param)
    }

    /// Declare an input/output parameter bound to `value`.
    pub fn add_input_output(
        &mut self,
        name: &str,
        value: impl Into<SqlValue>,
        size: usize,
    ) -> Result<&mut DaoParameter<D::Param>> {
        let value = value.into();
        let db_type = value.db_type();
        let param = self.declare(name, ParameterDirection::InputOutput)?;
        param.set_db_type(db_type).set_size(size).set_value(value);
        Ok(param)
    }

    /// Declare the stored procedure return value.
    pub fn add_return_value(&mut self, name: &str, db_type: DbType) -> Result<&mut DaoParameter<D::Param>> {
        let param = self.declare(name, ParameterDirection::ReturnValue)?;
        param.set_db_type(db_type);
        Ok(param)
    }

    /// Parameter names referenced by the command text.
    #[must_use]
    pub fn referenced_parameters(&self) -> Arc<Vec<String>> {
        let sql = self.driver.command_text();
        let prefix = self.config.parameter_prefix.as_str();
        if self.config.use_scan_cache {
            ScanCache::shared().scan(sql, prefix)
        } else {
            Arc::new(dao_sql::extract_parameter_names(sql, prefix))
        }
    }

    /// Check the declared parameters against the command text.
    ///
    /// Runs once; later calls return immediately until another parameter is
    /// declared. Does nothing when validation is disabled.
    pub fn validate_parameters(&mut self) -> Result<()> {
        if self.validated || !self.config.validate_parameters {
            return Ok(());
        }

        let referenced = self.referenced_parameters();
        let report = self.registry.validate_against(referenced.as_slice());
        if let Err(e) = report.into_result() {
            tracing::error!(
                operation = extract_operation(self.driver.command_text()),
                command = %self.engine.statement(),
                error = %e,
                "parameter validation failed"
            );
            return Err(e.into());
        }

        self.validated = true;
        Ok(())
    }

    /// Execute the command for its affected row count, summed over calls.
    pub fn execute_non_query(&mut self) -> Result<u64> {
        self.validate_parameters()?;

        let Self {
            driver,
            registry,
            engine,
            ..
        } = self;
        let mut affected = 0;
        engine.execute(registry, ExecutionMode::NonQuery, |_, registry| {
            affected += driver
                .execute_non_query(&mut registry.handles_mut())
                .map_err(Error::driver)?;
            Ok(())
        })?;

        Ok(affected)
    }

    /// Execute the command and feed every row of every call to `on_row`.
    ///
    /// Outputs of a call are captured once its rows are consumed. An error
    /// from `on_row` is wrapped in [`Error::RowRead`] with the row and call
    /// position. Returns the number of rows read.
    pub fn execute_reader<F>(&mut self, mut on_row: F) -> Result<usize>
    where
        F: FnMut(&RowReader<D::Rows>) -> Result<()>,
    {
        self.validate_parameters()?;

        let Self {
            driver,
            registry,
            engine,
            ..
        } = self;
        let statement = engine.statement().to_string();
        let mut rows_read = 0;

        engine.execute(registry, ExecutionMode::Query, |call_index, registry| {
            // Already checked by the engine before the first call.
            let total_calls = registry.calls_required()?;
            let rows = driver
                .execute_reader(&mut registry.handles_mut())
                .map_err(Error::driver)?;
            let mut reader = RowReader::new(rows);

            while reader.advance()? {
                if let Err(e) = on_row(&reader) {
                    let position = no_of_calls_str(call_index + 1, total_calls, reader.row_index());
                    let parameters = registry.for_log();
                    tracing::error!(
                        command = %statement,
                        position = %position,
                        parameters = %parameters,
                        error = %e,
                        "error reading row"
                    );
                    return Err(Error::row_read(position, parameters, e));
                }
                rows_read += 1;
            }
            drop(reader);

            for param in registry.iter_mut() {
                param.post_call();
            }
            Ok(())
        })?;

        Ok(rows_read)
    }

    /// Execute the command for a single value converted to `T`.
    ///
    /// With several calls, the value of the last call is returned. NULL
    /// converts to `T`'s null default.
    pub fn execute_scalar<T: FromSqlValue>(&mut self) -> Result<T> {
        self.validate_parameters()?;

        let Self {
            driver,
            registry,
            engine,
            ..
        } = self;
        let mut result = SqlValue::Null;
        engine.execute(registry, ExecutionMode::Scalar, |_, registry| {
            result = driver
                .execute_scalar(&mut registry.handles_mut())
                .map_err(Error::driver)?;
            Ok(())
        })?;

        Ok(convert_value_or_default(&result)?)
    }

    /// Execute the command and collect its rows into a map.
    ///
    /// A key produced twice fails with [`Error::DuplicateKey`], wrapped in
    /// [`Error::RowRead`].
    pub fn read_dictionary<K, V, FK, FV>(&mut self, mut key: FK, mut value: FV) -> Result<HashMap<K, V>>
    where
        K: Eq + Hash + Display,
        FK: FnMut(&RowReader<D::Rows>) -> Result<K>,
        FV: FnMut(&RowReader<D::Rows>) -> Result<V>,
    {
        let mut map = HashMap::new();
        self.execute_reader(|row| {
            let k = key(row)?;
            if map.contains_key(&k) {
                return Err(Error::DuplicateKey(k.to_string()));
            }
            let v = value(row)?;
            map.insert(k, v);
            Ok(())
        })?;
        Ok(map)
    }

    /// Replay the outputs captured by the last execution, one row per call.
    pub fn read_returned_params<F>(&mut self, on_read: F) -> Result<()>
    where
        F: FnMut(usize, &ParameterRegistry<D::Param>) -> Result<()>,
    {
        self.engine.read_returned_params(&mut self.registry, on_read)
    }
}

impl<D: Driver, H> std::fmt::Debug for DaoCommand<D, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaoCommand")
            .field("command", &self.driver.command_text())
            .field("parameters", &self.registry.len())
            .field("validated", &self.validated)
            .finish()
    }
}
