//! Declared-versus-referenced parameter validation.
//!
//! Validation compares two lists of names: the parameters a caller declared
//! on a command, and the parameter tokens the SQL text references (usually
//! the output of [`extract_parameter_names`](crate::scanner::extract_parameter_names)).
//! All comparisons are case-insensitive and the result does not depend on
//! the order of either list.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::ValidationError;

/// A declared parameter as seen by the validator.
pub trait ParameterDecl {
    /// Parameter name, without prefix.
    fn name(&self) -> &str;

    /// Number of array-bound input values, 0 when the parameter is scalar.
    fn input_array_size(&self) -> usize;

    /// Whether the parameter takes part in input binding.
    ///
    /// Parameters that do not accept input never influence the call count.
    fn accepts_input(&self) -> bool {
        true
    }
}

impl<T: ParameterDecl + ?Sized> ParameterDecl for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn input_array_size(&self) -> usize {
        (**self).input_array_size()
    }

    fn accepts_input(&self) -> bool {
        (**self).accepts_input()
    }
}

/// Outcome of validating a command's parameters.
///
/// Names are stored lower-cased and sorted. An empty report means the
/// parameters are consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Declared, but never referenced by the SQL text.
    pub missing: Vec<String>,
    /// Referenced by the SQL text, but never declared.
    pub unknown: Vec<String>,
    /// Referenced more than once in the supplied reference list.
    pub duplicated_in_sql: Vec<String>,
    /// Declared more than once.
    pub duplicated_in_declaration: Vec<String>,
    /// Input arrays whose sizes disagree, with their sizes.
    pub array_size_mismatch: Vec<(String, usize)>,
}

impl ValidationReport {
    /// Whether no issue was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
            && self.unknown.is_empty()
            && self.duplicated_in_sql.is_empty()
            && self.duplicated_in_declaration.is_empty()
            && self.array_size_mismatch.is_empty()
    }

    /// One rendered line per non-empty category, in fixed order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        let named = [
            ("Missing Parameters", &self.missing),
            ("Unknown Parameters", &self.unknown),
            ("Duplicated Parameters in SQL", &self.duplicated_in_sql),
            ("Duplicated Parameters", &self.duplicated_in_declaration),
        ];
        for (label, names) in named {
            if !names.is_empty() {
                lines.push(format!("{label}: {}", names.join(", ")));
            }
        }

        if !self.array_size_mismatch.is_empty() {
            let sizes: Vec<String> = self
                .array_size_mismatch
                .iter()
                .map(|(name, size)| format!("{name} ({size})"))
                .collect();
            lines.push(format!(
                "Parameter Array Size Mismatch: {}",
                sizes.join(", ")
            ));
        }

        lines
    }

    /// `Ok(())` when empty, otherwise a [`ValidationError`] carrying `self`.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// Validate declared parameters against the names referenced by SQL text.
///
/// # Example
///
/// ```
/// use dao_sql::validator::{ParameterDecl, validate};
///
/// struct Decl(&'static str);
///
/// impl ParameterDecl for Decl {
///     fn name(&self) -> &str {
///         self.0
///     }
///     fn input_array_size(&self) -> usize {
///         0
///     }
/// }
///
/// let declared = [Decl("One"), Decl("Two"), Decl("Three")];
/// let report = validate(&declared, &["Two"]);
/// assert_eq!(report.to_string(), "Missing Parameters: one, three");
/// ```
#[must_use]
pub fn validate<D, S>(declared: &[D], referenced: &[S]) -> ValidationReport
where
    D: ParameterDecl,
    S: AsRef<str>,
{
    let declared_counts = count_lowercase(declared.iter().map(|p| p.name()));
    let referenced_counts = count_lowercase(referenced.iter().map(|r| r.as_ref()));

    let missing = declared_counts
        .keys()
        .filter(|name| !referenced_counts.contains_key(*name))
        .cloned()
        .collect();
    let unknown = referenced_counts
        .keys()
        .filter(|name| !declared_counts.contains_key(*name))
        .cloned()
        .collect();

    ValidationReport {
        missing,
        unknown,
        duplicated_in_sql: duplicates(&referenced_counts),
        duplicated_in_declaration: duplicates(&declared_counts),
        array_size_mismatch: array_size_conflicts(declared),
    }
}

/// Input-capable parameters whose array sizes disagree.
///
/// Sizes of 0 and 1 are broadcastable and never conflict. When more than one
/// distinct size above 1 exists, every parameter carrying such a size is
/// returned (lower-cased, sorted by name). Otherwise the result is empty.
#[must_use]
pub fn array_size_conflicts<D: ParameterDecl>(declared: &[D]) -> Vec<(String, usize)> {
    let sized: Vec<(String, usize)> = declared
        .iter()
        .filter(|p| p.accepts_input() && p.input_array_size() > 1)
        .map(|p| (p.name().to_lowercase(), p.input_array_size()))
        .collect();

    let distinct: BTreeSet<usize> = sized.iter().map(|&(_, size)| size).collect();
    if distinct.len() <= 1 {
        return Vec::new();
    }

    let mut conflicts = sized;
    conflicts.sort();
    conflicts
}

fn count_lowercase<'a>(names: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for name in names {
        *counts.entry(name.to_lowercase()).or_insert(0) += 1;
    }
    counts
}

fn duplicates(counts: &BTreeMap<String, usize>) -> Vec<String> {
    counts
        .iter()
        .filter(|&(_, &count)| count > 1)
        .map(|(name, _)| name.clone())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Decl {
        name: String,
        size: usize,
        input: bool,
    }

    fn decl(name: &str) -> Decl {
        sized(name, 0)
    }

    fn sized(name: &str, size: usize) -> Decl {
        Decl {
            name: name.to_string(),
            size,
            input: true,
        }
    }

    impl ParameterDecl for Decl {
        fn name(&self) -> &str {
            &self.name
        }

        fn input_array_size(&self) -> usize {
            self.size
        }

        fn accepts_input(&self) -> bool {
            self.input
        }
    }

    #[test]
    fn test_missing_parameters() {
        let report = validate(&[decl("One"), decl("Two"), decl("Three")], &["Two"]);
        assert_eq!(report.lines(), vec!["Missing Parameters: one, three"]);
    }

    #[test]
    fn test_unknown_parameters() {
        let report = validate(&[decl("a")], &["A", "Zed", "b"]);
        assert_eq!(report.to_string(), "Unknown Parameters: b, zed");
    }

    #[test]
    fn test_matching_parameters_pass() {
        let report = validate(&[decl("Id"), decl("NAME")], &["name", "id"]);
        assert!(report.is_empty());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_duplicates_reported_separately() {
        let report = validate(&[decl("a"), decl("A"), decl("b")], &["a", "b", "B"]);
        assert_eq!(
            report.lines(),
            vec![
                "Duplicated Parameters in SQL: b",
                "Duplicated Parameters: a",
            ]
        );
    }

    #[test]
    fn test_all_categories_in_fixed_order() {
        let declared = [
            sized("x", 3),
            sized("y", 5),
            decl("dup"),
            decl("DUP"),
            decl("unused"),
        ];
        let report = validate(&declared, &["x", "y", "dup", "ghost", "ghost"]);
        let err = report.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing Parameters: unused\n\
             Unknown Parameters: ghost\n\
             Duplicated Parameters in SQL: ghost\n\
             Duplicated Parameters: dup\n\
             Parameter Array Size Mismatch: x (3), y (5)"
        );
    }

    #[test]
    fn test_broadcastable_sizes_never_conflict() {
        let declared = [sized("a", 0), sized("b", 1), sized("c", 1), sized("d", 10)];
        assert!(array_size_conflicts(&declared).is_empty());
    }

    #[test]
    fn test_two_large_sizes_conflict() {
        let declared = [sized("b", 1), sized("Ten", 10), sized("nine", 9)];
        assert_eq!(
            array_size_conflicts(&declared),
            vec![("nine".to_string(), 9), ("ten".to_string(), 10)]
        );
    }

    #[test]
    fn test_equal_sizes_do_not_conflict() {
        let declared = [sized("a", 4), sized("b", 4), sized("c", 1)];
        assert!(array_size_conflicts(&declared).is_empty());
    }

    #[test]
    fn test_output_only_arrays_ignored() {
        let mut out = sized("out", 7);
        out.input = false;
        let declared = [sized("a", 3), out];
        assert!(array_size_conflicts(&declared).is_empty());
    }

    fn flip_case(s: &str, upper: bool) -> String {
        if upper { s.to_uppercase() } else { s.to_lowercase() }
    }

    proptest! {
        #[test]
        fn prop_validate_order_and_case_independent(
            declared in prop::collection::vec("[a-d]{1,2}", 0..6),
            referenced in prop::collection::vec("[a-d]{1,2}", 0..6),
            upper in any::<bool>(),
        ) {
            let base = validate(
                &declared.iter().map(|n| decl(n)).collect::<Vec<_>>(),
                &referenced,
            );

            let mut shuffled_declared: Vec<Decl> = declared
                .iter()
                .rev()
                .map(|n| decl(&flip_case(n, upper)))
                .collect();
            shuffled_declared.rotate_left(declared.len() / 2);
            let shuffled_referenced: Vec<String> = referenced
                .iter()
                .rev()
                .map(|n| flip_case(n, !upper))
                .collect();

            prop_assert_eq!(base, validate(&shuffled_declared, &shuffled_referenced));
        }
    }
}
