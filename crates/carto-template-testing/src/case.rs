use serde_json::Value;
use std::error::Error as StdError;
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::Error;
use crate::expectations::{Expectation, diff};
use crate::jsonpath::PathEvaluator;
use crate::resources::ClusterTemplate;
use crate::stamper::{Stamp, Stamper, TemplateEngine};
use crate::yaml::render_yaml;

/// Reason why a test case did not pass
#[derive(Error, Debug)]
pub enum CaseFailure {
    #[error("unexpected err: {0}")]
    UnexpectedError(#[source] Error),

    #[error("err '{actual}' doesn't contain expected '{expected}'")]
    ErrorMismatch {
        #[source]
        actual: Error,
        expected: String,
    },

    #[error("expected err containing '{0}', but the template was stamped")]
    MissingError(String),

    #[error("(-expected, +actual) = {0}")]
    ObjectMismatch(String),

    #[error("expectation #{index} on '{path}' failed: {source}")]
    Expectation {
        index: usize,
        path: String,
        source: Error,
    },
}

/// A single scenario: how to stamp the template under test, and what the
/// outcome must be.
///
/// The outcome is checked, in this order, against `expected_err`,
/// `expected` and finally each one of the `expect` expectations.
pub struct TestCase {
    pub name: String,
    pub given: Box<dyn Stamp>,
    pub expect: Vec<Expectation>,
    pub expected_err: Option<String>,
    pub expected: Option<Value>,
}

impl TestCase {
    pub fn new(name: &str) -> TestCase {
        TestCase {
            name: name.to_owned(),
            given: Box::new(Stamper::new()),
            expect: Vec::new(),
            expected_err: None,
            expected: None,
        }
    }

    pub fn given(mut self, stamper: impl Stamp + 'static) -> TestCase {
        self.given = Box::new(stamper);
        self
    }

    pub fn expect(mut self, expectation: Expectation) -> TestCase {
        self.expect.push(expectation);
        self
    }

    /// The stamping must fail with an error containing `msg`
    pub fn expected_err(mut self, msg: &str) -> TestCase {
        self.expected_err = Some(msg.to_owned());
        self
    }

    /// The stamped object must be exactly `obj`
    pub fn expected(mut self, obj: Value) -> TestCase {
        self.expected = Some(obj);
        self
    }

    pub fn run(
        &self,
        engine: &dyn TemplateEngine,
        evaluator: &dyn PathEvaluator,
        template: &ClusterTemplate,
    ) -> Result<(), CaseFailure> {
        let actual = match self.given.stamp(engine, template) {
            Ok(actual) => actual,
            Err(err) => {
                return match &self.expected_err {
                    None => Err(CaseFailure::UnexpectedError(err)),
                    Some(expected) if error_message(&err).contains(expected.as_str()) => Ok(()),
                    Some(expected) => Err(CaseFailure::ErrorMismatch {
                        actual: err,
                        expected: expected.clone(),
                    }),
                };
            }
        };

        match render_yaml(&actual) {
            Ok(rendered) => info!(case = self.name.as_str(), "stamped object:\n{rendered}"),
            Err(e) => warn!(case = self.name.as_str(), error = %e, "cannot render stamped object"),
        }

        if let Some(expected) = &self.expected_err {
            return Err(CaseFailure::MissingError(expected.clone()));
        }

        if let Some(expected) = &self.expected {
            if let Some(diff) = diff(expected, &actual) {
                return Err(CaseFailure::ObjectMismatch(diff));
            }
        }

        for (index, expectation) in self.expect.iter().enumerate() {
            expectation
                .validate(evaluator, &actual)
                .map_err(|source| CaseFailure::Expectation {
                    index,
                    path: expectation.path.clone(),
                    source,
                })?;
        }

        Ok(())
    }
}

/// The message of the error, followed by the ones of its causes that are
/// not already part of it
fn error_message(err: &Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !msg.contains(&cause_msg) {
            msg.push_str(": ");
            msg.push_str(&cause_msg);
        }
        source = cause.source();
    }
    msg
}
