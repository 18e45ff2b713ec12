//! Helpers for log events emitted by commands.
//!
//! Every error is logged once, where it is detected, with the operation
//! kind and the command text. Command text may carry literal values, so it
//! goes through [`SanitizationConfig`] first.

use crate::config::DaoConfig;

/// Kind of logical execution, used as the `operation` field of log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Statement run for its affected row count.
    NonQuery,
    /// Statement run for its rows.
    Query,
    /// Statement run for a single value.
    Scalar,
}

impl OperationKind {
    /// Label used in log events.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NonQuery => "non-query",
            Self::Query => "query",
            Self::Scalar => "scalar",
        }
    }
}

/// Configuration for SQL statement sanitization.
#[derive(Debug, Clone)]
pub struct SanitizationConfig {
    /// Whether to sanitize SQL statements.
    pub enabled: bool,
    /// Maximum length of statement to record.
    pub max_length: usize,
    /// Placeholder to use for sanitized values.
    pub placeholder: String,
}

impl Default for SanitizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_length: 2048,
            placeholder: "?".to_string(),
        }
    }
}

impl SanitizationConfig {
    /// Create a configuration that doesn't sanitize statements.
    #[must_use]
    pub fn no_sanitization() -> Self {
        Self {
            enabled: false,
            max_length: usize::MAX,
            placeholder: String::new(),
        }
    }

    /// The sanitization matching a command configuration.
    #[must_use]
    pub fn from_config(config: &DaoConfig) -> Self {
        if config.sanitize_statements {
            Self::default()
        } else {
            Self::no_sanitization()
        }
    }

    /// Sanitize a SQL statement according to the configuration.
    #[must_use]
    pub fn sanitize(&self, sql: &str) -> String {
        if !self.enabled {
            return truncate_string(sql, self.max_length);
        }

        let sanitized = sanitize_sql(sql, &self.placeholder);
        truncate_string(&sanitized, self.max_length)
    }
}

/// Replace string and numeric literals with `placeholder`.
fn sanitize_sql(sql: &str, placeholder: &str) -> String {
    let mut result = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut in_string = false;
    let mut string_char = ' ';

    while let Some(c) = chars.next() {
        if in_string {
            if c == string_char {
                if chars.peek() == Some(&string_char) {
                    chars.next();
                    continue;
                }
                in_string = false;
                result.push_str(placeholder);
            }
            continue;
        }

        if c == '\'' {
            in_string = true;
            string_char = c;
            continue;
        }

        // Digits inside identifiers and parameter names stay.
        if c.is_ascii_digit()
            && !result.ends_with(|ch: char| ch.is_alphanumeric() || matches!(ch, '_' | '@' | ':' | '$'))
        {
            while chars
                .peek()
                .is_some_and(|ch| ch.is_ascii_digit() || *ch == '.')
            {
                chars.next();
            }
            result.push_str(placeholder);
            continue;
        }

        result.push(c);
    }

    if in_string {
        result.push_str(placeholder);
    }

    result
}

/// Truncate a string to at most `max_len` characters.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

/// Extract the operation type from a SQL statement.
#[must_use]
pub fn extract_operation(sql: &str) -> &'static str {
    let sql_upper = dao_sql::strip(sql).trim().to_uppercase();

    if sql_upper.starts_with("SELECT") {
        "SELECT"
    } else if sql_upper.starts_with("INSERT") {
        "INSERT"
    } else if sql_upper.starts_with("UPDATE") {
        "UPDATE"
    } else if sql_upper.starts_with("DELETE") {
        "DELETE"
    } else if sql_upper.starts_with("MERGE") {
        "MERGE"
    } else if sql_upper.starts_with("EXEC") || sql_upper.starts_with("CALL") {
        "EXECUTE"
    } else if sql_upper.starts_with("WITH") {
        "WITH"
    } else {
        "OTHER"
    }
}
