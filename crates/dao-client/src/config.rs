//! Command configuration.

use crate::error::Error;

/// Default parameter prefix.
pub const DEFAULT_PARAMETER_PREFIX: &str = "@";

/// Settings shared by the commands of one data-access component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaoConfig {
    /// Prefix that introduces a parameter reference in command text.
    pub parameter_prefix: String,

    /// Whether declared parameters are validated against the command text
    /// before the first execution.
    pub validate_parameters: bool,

    /// Whether parameter values appear in log events and error snapshots.
    pub log_parameter_values: bool,

    /// Longest rendered parameter value in a log event.
    pub max_logged_value_len: usize,

    /// Whether command text is sanitized before it is logged.
    pub sanitize_statements: bool,

    /// Whether command text scans go through the shared scan cache.
    pub use_scan_cache: bool,
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self {
            parameter_prefix: DEFAULT_PARAMETER_PREFIX.to_string(),
            validate_parameters: true,
            log_parameter_values: true,
            max_logged_value_len: 256,
            sanitize_statements: false,
            use_scan_cache: true,
        }
    }
}

impl DaoConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a settings string into configuration.
    ///
    /// Keys are case-insensitive; unknown keys are ignored:
    /// ```text
    /// Parameter Prefix=:;Validate Parameters=false;Scan Cache=no;
    /// ```
    pub fn from_settings_str(settings: &str) -> Result<Self, Error> {
        let mut config = Self::default();

        for part in settings.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| Error::Config(format!("invalid key-value: {part}")))?;

            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "parameter prefix" | "prefix" => {
                    if value.is_empty() {
                        return Err(Error::Config("parameter prefix cannot be empty".into()));
                    }
                    config.parameter_prefix = value.to_string();
                }
                "validate parameters" => {
                    config.validate_parameters = parse_flag(&key, value)?;
                }
                "log parameter values" => {
                    config.log_parameter_values = parse_flag(&key, value)?;
                }
                "max logged value length" => {
                    config.max_logged_value_len = value.parse().map_err(|_| {
                        Error::Config(format!("invalid max logged value length: {value}"))
                    })?;
                }
                "sanitize statements" => {
                    config.sanitize_statements = parse_flag(&key, value)?;
                }
                "scan cache" | "use scan cache" => {
                    config.use_scan_cache = parse_flag(&key, value)?;
                }
                _ => {
                    tracing::debug!(
                        key = key,
                        value = value,
                        "ignoring unknown settings option"
                    );
                }
            }
        }

        Ok(config)
    }

    /// Set the parameter prefix.
    #[must_use]
    pub fn parameter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.parameter_prefix = prefix.into();
        self
    }

    /// Enable or disable parameter validation.
    #[must_use]
    pub fn validate_parameters(mut self, enabled: bool) -> Self {
        self.validate_parameters = enabled;
        self
    }

    /// Enable or disable parameter values in logs.
    #[must_use]
    pub fn log_parameter_values(mut self, enabled: bool) -> Self {
        self.log_parameter_values = enabled;
        self
    }

    /// Set the longest rendered parameter value in a log event.
    #[must_use]
    pub fn max_logged_value_len(mut self, len: usize) -> Self {
        self.max_logged_value_len = len;
        self
    }

    /// Enable or disable statement sanitization in logs.
    #[must_use]
    pub fn sanitize_statements(mut self, enabled: bool) -> Self {
        self.sanitize_statements = enabled;
        self
    }

    /// Enable or disable the shared scan cache.
    #[must_use]
    pub fn use_scan_cache(mut self, enabled: bool) -> Self {
        self.use_scan_cache = enabled;
        self
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, Error> {
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes") || value == "1" {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") || value.eq_ignore_ascii_case("no") || value == "0"
    {
        Ok(false)
    } else {
        Err(Error::Config(format!("invalid {key}: {value}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_string_parsing() {
        let config = DaoConfig::from_settings_str(
            "Parameter Prefix=:;Validate Parameters=no;Max Logged Value Length=32;Scan Cache=0;",
        )
        .unwrap();

        assert_eq!(config.parameter_prefix, ":");
        assert!(!config.validate_parameters);
        assert_eq!(config.max_logged_value_len, 32);
        assert!(!config.use_scan_cache);
        assert!(config.log_parameter_values);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = DaoConfig::from_settings_str("Colour=blue; sanitize statements = TRUE").unwrap();
        assert!(config.sanitize_statements);
        assert_eq!(config.parameter_prefix, "@");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(matches!(
            DaoConfig::from_settings_str("validate parameters=maybe"),
            Err(Error::Config(_))
        ));
        assert!(DaoConfig::from_settings_str("prefix=").is_err());
        assert!(DaoConfig::from_settings_str("no equals sign").is_err());
        assert!(DaoConfig::from_settings_str("max logged value length=-1").is_err());
    }

    #[test]
    fn test_builder() {
        let config = DaoConfig::new()
            .parameter_prefix("~")
            .validate_parameters(false)
            .use_scan_cache(false);
        assert_eq!(config.parameter_prefix, "~");
        assert!(!config.validate_parameters);
        assert!(!config.use_scan_cache);
    }
}
