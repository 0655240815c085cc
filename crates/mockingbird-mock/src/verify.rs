//! Assertion helpers over a mock's recorded calls.
//!
//! Each helper returns `Ok(())` or a [`VerificationError`] describing what
//! was recorded, so a test can use `?` or `unwrap()` and get a readable
//! failure. None of them touch the ledger.

use serde_json::Value;

use crate::error::VerificationError;
use crate::instance::MockInstance;

fn failure(mock: &MockInstance, message: String) -> VerificationError {
    VerificationError {
        capability: mock.capability().to_string(),
        message,
    }
}

fn recorded_methods(mock: &MockInstance) -> String {
    let methods: Vec<String> = mock
        .ledger()
        .records()
        .into_iter()
        .map(|r| r.method_id)
        .collect();
    if methods.is_empty() {
        "no calls".to_string()
    } else {
        methods.join(", ")
    }
}

/// Fails unless `method` was called at least once.
pub fn expect_called(mock: &MockInstance, method: &str) -> Result<(), VerificationError> {
    if mock.ledger().was_called(method) {
        Ok(())
    } else {
        Err(failure(
            mock,
            format!("expected {method} to be called; recorded: {}", recorded_methods(mock)),
        ))
    }
}

/// Fails unless `method` was called exactly `times` times.
pub fn expect_called_times(
    mock: &MockInstance,
    method: &str,
    times: usize,
) -> Result<(), VerificationError> {
    let actual = mock.ledger().call_count(method);
    if actual == times {
        Ok(())
    } else {
        Err(failure(
            mock,
            format!("expected {method} to be called {times} time(s), was called {actual}"),
        ))
    }
}

/// Fails if `method` was called.
pub fn expect_never_called(mock: &MockInstance, method: &str) -> Result<(), VerificationError> {
    let actual = mock.ledger().call_count(method);
    if actual == 0 {
        Ok(())
    } else {
        Err(failure(
            mock,
            format!("expected {method} never to be called, was called {actual}"),
        ))
    }
}

/// Fails unless some call to `method` had exactly `arguments`.
pub fn expect_called_with(
    mock: &MockInstance,
    method: &str,
    arguments: &[Value],
) -> Result<(), VerificationError> {
    if mock.ledger().was_called_with(method, arguments) {
        return Ok(());
    }

    let seen: Vec<String> = mock
        .ledger()
        .history(method)
        .iter()
        .map(|r| Value::Array(r.arguments.clone()).to_string())
        .collect();

    Err(failure(
        mock,
        format!(
            "expected {method} to be called with {}; recorded arguments: [{}]",
            Value::Array(arguments.to_vec()),
            seen.join(", ")
        ),
    ))
}

/// Fails unless the calls contain `methods` in this order.
pub fn expect_called_in_order<S: AsRef<str>>(
    mock: &MockInstance,
    methods: &[S],
) -> Result<(), VerificationError> {
    if mock.ledger().called_in_order(methods) {
        return Ok(());
    }

    let expected: Vec<&str> = methods.iter().map(AsRef::as_ref).collect();
    Err(failure(
        mock,
        format!(
            "expected calls in order [{}]; recorded: {}",
            expected.join(", "),
            recorded_methods(mock)
        ),
    ))
}
