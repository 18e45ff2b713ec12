//! Parameter validation through `DaoCommand`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use dao_client::{DaoCommand, DaoConfig, DbType, Error};
use dao_testing::{MockDriver, init_tracing};

fn command(sql: &str, config: DaoConfig) -> DaoCommand<MockDriver> {
    init_tracing();
    DaoCommand::new(MockDriver::new(sql), config)
}

#[test]
fn test_missing_parameters_reported() {
    let mut cmd = command("SELECT * FROM t WHERE b = @Two", DaoConfig::default());
    cmd.add_input("One", 1).unwrap();
    cmd.add_input("Two", 2).unwrap();
    cmd.add_input("Three", 3).unwrap();

    let err = cmd.execute_non_query().unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(err.to_string(), "Missing Parameters: one, three");
    assert!(cmd.driver().calls().is_empty());
}

#[test]
fn test_every_category_reported_together() {
    let sql = "UPDATE t SET a = @a, b = @ghost -- @commented\nWHERE c = '@quoted'";
    let mut cmd = command(sql, DaoConfig::default());
    cmd.add_input("a", 1).unwrap();
    cmd.add_input("A", 2).unwrap();
    cmd.add_input("unused", 3).unwrap();

    let err = cmd.validate_parameters().unwrap_err();
    let Error::Validation(validation) = &err else {
        panic!("expected a validation error");
    };
    let report = validation.report();
    assert_eq!(report.missing, vec!["unused"]);
    assert_eq!(report.unknown, vec!["ghost"]);
    assert_eq!(report.duplicated_in_declaration, vec!["a"]);
    assert!(report.duplicated_in_sql.is_empty());
    assert_eq!(
        err.to_string(),
        "Missing Parameters: unused\nUnknown Parameters: ghost\nDuplicated Parameters: a"
    );
}

#[test]
fn test_repeated_reference_is_not_a_duplicate() {
    let mut cmd = command(
        "SELECT * FROM t WHERE a = @id OR b = @ID",
        DaoConfig::default(),
    );
    cmd.add_input("Id", 7).unwrap();
    cmd.validate_parameters().unwrap();
}

#[test]
fn test_validation_runs_once_until_redeclared() {
    let mut cmd = command("SELECT @a", DaoConfig::default());
    cmd.add_input("a", 1).unwrap();
    cmd.execute_scalar::<i32>().unwrap();
    cmd.execute_scalar::<i32>().unwrap();

    cmd.add_input("extra", 2).unwrap();
    let err = cmd.execute_scalar::<i32>().unwrap_err();
    assert_eq!(err.to_string(), "Missing Parameters: extra");
}

#[test]
fn test_validation_can_be_disabled() {
    let mut cmd = command("SELECT 1", DaoConfig::new().validate_parameters(false));
    cmd.add_input("unused", 1).unwrap();
    cmd.execute_non_query().unwrap();
    assert_eq!(cmd.driver().calls().len(), 1);
}

#[test]
fn test_custom_prefix() {
    let config = DaoConfig::from_settings_str("Parameter Prefix=:;Scan Cache=false").unwrap();
    let mut cmd = command("SELECT * FROM t WHERE a = :a AND b::int = 1 AND c = @c", config);
    cmd.add_input(":a", 1).unwrap();
    cmd.validate_parameters().unwrap();

    assert_eq!(cmd.parameter("a").unwrap().handle().name, ":a");
    assert_eq!(*cmd.referenced_parameters(), vec!["a"]);
}

#[test]
fn test_invalid_parameter_name_rejected() {
    let mut cmd = command("SELECT @a", DaoConfig::default());
    let err = cmd.add_output("a b", DbType::Int32, 4).unwrap_err();
    assert!(matches!(err, Error::InvalidIdentifier(_)));
    assert!(cmd.parameters().is_empty());
}
