//! Fuzz target for parameter extraction and validation.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    sql: &'a str,
    prefix: &'a str,
}

struct Decl(String);

impl dao_sql::ParameterDecl for Decl {
    fn name(&self) -> &str {
        &self.0
    }

    fn input_array_size(&self) -> usize {
        self.0.len()
    }
}

fuzz_target!(|input: Input<'_>| {
    let names = dao_sql::extract_parameter_names(input.sql, input.prefix);
    let tokens = dao_sql::scan_parameter_tokens(input.sql, input.prefix);
    assert!(names.len() <= tokens.len());

    for name in &names {
        assert!(!name.is_empty());
        assert!(name.chars().all(dao_sql::scanner::is_identifier_char));
    }

    // Every referenced name is declared, so only array sizes can disagree.
    let declared: Vec<Decl> = names.iter().cloned().map(Decl).collect();
    let report = dao_sql::validate(&declared, &names);
    assert!(report.missing.is_empty());
    assert!(report.unknown.is_empty());
    assert!(report.duplicated_in_sql.is_empty());
    assert!(report.duplicated_in_declaration.is_empty());
});
