//! Batch execution through `DaoCommand` with the mock driver.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use dao_client::{
    BatchHooks, DaoCommand, DaoConfig, DbType, Error, ParameterDirection, SqlValue, TypedValue,
};
use dao_testing::{MockDriver, MockError, MockResponse, init_tracing, param};

fn command(driver: MockDriver) -> DaoCommand<MockDriver> {
    init_tracing();
    DaoCommand::new(driver, DaoConfig::default())
}

#[test]
fn test_arrays_fan_out_into_calls() {
    let sql = "INSERT INTO t (id, name, kind) VALUES (@id, @name, @kind)";
    let mut cmd = command(MockDriver::new(sql).on_call(|_, _| Ok(MockResponse::affected(1))));
    cmd.add_input_values("id", [1, 2, 3]).unwrap();
    cmd.add_input_values("name", ["a", "b", "c"]).unwrap();
    cmd.add_input_values("kind", ["shared"]).unwrap();

    assert_eq!(cmd.execute_non_query().unwrap(), 3);

    let calls = cmd.driver().calls();
    assert_eq!(calls.len(), 3);
    for (i, call) in calls.iter().enumerate() {
        let expected_id = i32::try_from(i).unwrap() + 1;
        assert_eq!(call.kind, "non-query");
        assert_eq!(call.input("@id"), Some(&SqlValue::Int(expected_id)));
        assert_eq!(call.input("@kind"), Some(&SqlValue::from("shared")));
    }
    assert_eq!(calls[1].input("@name"), Some(&SqlValue::from("b")));
}

#[test]
fn test_scalar_parameters_make_one_call() {
    let sql = "UPDATE t SET a = @a";
    let mut cmd = command(MockDriver::new(sql).on_call(|_, _| Ok(MockResponse::affected(4))));
    cmd.add_input("a", 5).unwrap();
    assert_eq!(cmd.execute_non_query().unwrap(), 4);
    assert_eq!(cmd.driver().calls().len(), 1);
    assert_eq!(cmd.parameter("A").unwrap().db_type(), DbType::Int32);
}

#[test]
fn test_outputs_captured_and_replayed() {
    let sql = "EXEC add_one @value, @result OUTPUT";
    let driver = MockDriver::new(sql).on_call(|_, params| {
        let input = match param(params, "@value").unwrap().value {
            SqlValue::Int(v) => v,
            ref other => return Err(MockError::new(format!("unexpected {other:?}"))),
        };
        param(params, "@result").unwrap().value = SqlValue::Int(input + 1);
        Ok(MockResponse::affected(0))
    });
    let mut cmd = command(driver);
    cmd.add_input_values("value", [10, 20, 30]).unwrap();
    cmd.add_output("result", DbType::Int32, 4).unwrap();

    cmd.execute_non_query().unwrap();
    assert_eq!(
        cmd.parameter("result").unwrap().output_values(),
        &[SqlValue::Int(11), SqlValue::Int(21), SqlValue::Int(31)]
    );

    let mut replayed = Vec::new();
    cmd.read_returned_params(|row, params| {
        let result: i32 = params.get("result").unwrap().get()?;
        replayed.push((row, result));
        Ok(())
    })
    .unwrap();
    assert_eq!(replayed, vec![(0, 11), (1, 21), (2, 31)]);
}

#[test]
fn test_driver_error_aborts_batch_unchanged() {
    let sql = "INSERT INTO t VALUES (@id)";
    let driver = MockDriver::new(sql).on_call(|index, _| {
        if index == 1 {
            Err(MockError::new("duplicate row"))
        } else {
            Ok(MockResponse::affected(1))
        }
    });
    let mut cmd = command(driver);
    cmd.add_input_values("id", [1, 2, 3]).unwrap();

    let err = cmd.execute_non_query().unwrap_err();
    assert_eq!(err.to_string(), "mock driver error: duplicate row");
    match &err {
        Error::Driver(source) => {
            let mock = source.downcast_ref::<MockError>().expect("mock error");
            assert_eq!(mock, &MockError::new("duplicate row"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(cmd.driver().calls().len(), 2);
}

#[test]
fn test_array_size_mismatch_rejected_before_calls() {
    let sql = "INSERT INTO t VALUES (@a, @b, @c)";
    let mut cmd = command(MockDriver::new(sql));
    cmd.add_input_values("a", 0..3).unwrap();
    cmd.add_input_values("b", 0..5).unwrap();
    cmd.add_input_values("c", [1]).unwrap();

    let err = cmd.execute_non_query().unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "Parameter Array Size Mismatch: a (3), b (5)");
    assert!(cmd.driver().calls().is_empty());
}

#[derive(Default)]
struct CountingHooks {
    batches: Vec<(usize, bool)>,
}

impl BatchHooks for CountingHooks {
    fn pre_on_execute(&mut self, calls: usize, is_query: bool) {
        self.batches.push((calls, is_query));
    }
}

#[test]
fn test_batch_hooks_see_each_execution() {
    let sql = "DELETE FROM t WHERE id = @id";
    let mut cmd = command(MockDriver::new(sql)).with_hooks(CountingHooks::default());
    cmd.add_input_values("id", [1, 2]).unwrap();
    cmd.execute_non_query().unwrap();
    cmd.execute_reader(|_| Ok(())).unwrap();
    assert_eq!(cmd.hooks().batches, vec![(2, false), (2, true)]);
}

#[test]
fn test_input_output_round_trip() {
    let sql = "EXEC bump @counter OUTPUT";
    let driver = MockDriver::new(sql).on_call(|_, params| {
        let counter = param(params, "@counter").unwrap();
        if let SqlValue::Int(v) = counter.value {
            counter.value = SqlValue::Int(v * 2);
        }
        Ok(MockResponse::default())
    });
    let mut cmd = command(driver);
    cmd.add_input_output("counter", 21, 4)
        .unwrap()
        .set_values([1, 2]);

    cmd.execute_non_query().unwrap();
    let counter = cmd.parameter("counter").unwrap();
    assert_eq!(counter.direction(), ParameterDirection::InputOutput);
    assert_eq!(counter.output_values(), &[SqlValue::Int(2), SqlValue::Int(4)]);
    assert_eq!(counter.value::<i32>().unwrap(), 4);
}
