//! Test runner implementation.
//!
//! Executes assertions against HTTP responses and produces test results.

use std::time::Instant;

use serde_json::Value;
use spoiler_domain::response::ResponseSpec;
use spoiler_domain::testing::{
    Assertion, AssertionResult, StatusExpectation, TestResults, TestSuite,
};

const PREVIEW_CHARS: usize = 100;

/// Test runner that executes assertions against responses.
#[derive(Debug, Default)]
pub struct TestRunner {
    /// Whether to stop on first failure.
    stop_on_failure: bool,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stop_on_failure: false,
        }
    }

    /// Set whether to stop on first failure.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Run a test suite against a response.
    #[must_use]
    pub fn run(&self, suite: &TestSuite, response: &ResponseSpec) -> TestResults {
        let start = Instant::now();
        let mut results = Vec::with_capacity(suite.assertions.len());

        for assertion in &suite.assertions {
            let result = self.run_assertion(assertion, response);
            let failed = !result.passed;
            results.push(result);

            if failed && (self.stop_on_failure || suite.stop_on_failure) {
                break;
            }
        }

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        TestResults::new(&suite.name, results, duration_ms)
    }

    /// Run a single assertion against a response.
    #[must_use]
    pub fn run_assertion(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match assertion {
            Assertion::StatusCode { expected } => check_status_code(assertion, response, expected),
            Assertion::BodyContains { text } => check_body_contains(assertion, response, text),
            Assertion::JsonPath { path, expected } => {
                check_json_path(assertion, response, path, expected.as_ref())
            }
            Assertion::JsonPathNotEmpty { path } => {
                check_json_path_not_empty(assertion, response, path)
            }
            Assertion::IsJsonArray => check_is_json_array(assertion, response),
        }
    }
}

fn check_status_code(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: &StatusExpectation,
) -> AssertionResult {
    let actual = response.status;
    if expected.matches(actual) {
        AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            actual.to_string(),
            format!("Expected status {}, got {actual}", expected.description()),
        )
    }
}

fn check_body_contains(
    assertion: &Assertion,
    response: &ResponseSpec,
    text: &str,
) -> AssertionResult {
    if response.body.contains(text) {
        AssertionResult::pass(assertion.clone())
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            preview(&response.body),
            format!("Body does not contain '{text}'"),
        )
    }
}

fn check_json_path(
    assertion: &Assertion,
    response: &ResponseSpec,
    path: &str,
    expected: Option<&Value>,
) -> AssertionResult {
    let json = match parse_body(response) {
        Ok(json) => json,
        Err(error) => {
            return AssertionResult::fail_with_value(
                assertion.clone(),
                preview(&response.body),
                error,
            );
        }
    };

    match query_json_path(&json, path) {
        Ok(Some(value)) => match expected {
            Some(expected_value) if value != expected_value => AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!(
                    "JSON path '{path}' value mismatch: expected {expected_value}, got {value}"
                ),
            ),
            _ => AssertionResult::pass_with_value(assertion.clone(), value.to_string()),
        },
        Ok(None) => {
            AssertionResult::fail(assertion.clone(), format!("JSON path '{path}' not found"))
        }
        Err(e) => {
            AssertionResult::fail(assertion.clone(), format!("Invalid JSON path '{path}': {e}"))
        }
    }
}

fn check_json_path_not_empty(
    assertion: &Assertion,
    response: &ResponseSpec,
    path: &str,
) -> AssertionResult {
    let json = match parse_body(response) {
        Ok(json) => json,
        Err(error) => {
            return AssertionResult::fail_with_value(
                assertion.clone(),
                preview(&response.body),
                error,
            );
        }
    };

    match query_json_path(&json, path) {
        Ok(Some(Value::String(s))) if !s.trim().is_empty() => {
            AssertionResult::pass_with_value(assertion.clone(), s.clone())
        }
        Ok(Some(value)) => AssertionResult::fail_with_value(
            assertion.clone(),
            value.to_string(),
            format!("JSON path '{path}' is empty or not a string"),
        ),
        Ok(None) => {
            AssertionResult::fail(assertion.clone(), format!("JSON path '{path}' not found"))
        }
        Err(e) => {
            AssertionResult::fail(assertion.clone(), format!("Invalid JSON path '{path}': {e}"))
        }
    }
}

fn check_is_json_array(assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
    match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Array(items)) => {
            AssertionResult::pass_with_value(assertion.clone(), format!("{} item(s)", items.len()))
        }
        Ok(other) => AssertionResult::fail_with_value(
            assertion.clone(),
            preview(&other.to_string()),
            "Body is valid JSON but not an array",
        ),
        Err(e) => AssertionResult::fail_with_value(
            assertion.clone(),
            preview(&response.body),
            format!("Body is not valid JSON: {e}"),
        ),
    }
}

fn parse_body(response: &ResponseSpec) -> Result<Value, String> {
    serde_json::from_str::<Value>(&response.body)
        .map_err(|e| format!("Failed to parse body as JSON: {e}"))
}

fn preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_CHARS {
        let head: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

/// Query a JSON value using a simple JSONPath-like syntax.
/// Supports: $.field, $.field.nested, $.array[0]
fn query_json_path<'a>(json: &'a Value, path: &str) -> Result<Option<&'a Value>, String> {
    let Some(rest) = path.trim().strip_prefix('$') else {
        return Err("JSON path must start with '$'".to_string());
    };

    let rest = rest.strip_prefix('.').unwrap_or(rest);
    let mut current = json;

    for segment in rest.split('.').filter(|s| !s.is_empty()) {
        let (name, index) = match segment.split_once('[') {
            Some((name, tail)) => {
                let index = tail
                    .strip_suffix(']')
                    .ok_or_else(|| format!("Unclosed bracket in segment '{segment}'"))?
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid array index in segment '{segment}'"))?;
                (name, Some(index))
            }
            None => (segment, None),
        };

        if !name.is_empty() {
            match current.get(name) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        }
        if let Some(index) = index {
            match current.get(index) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        }
    }

    Ok(Some(current))
}
