use assert_json_diff::{CompareMode, Config, assert_json_matches_no_panic};
use serde_json::Value;

use crate::constants::NO_RESULTS_MESSAGE;
use crate::errors::{Error, Result};
use crate::jsonpath::PathEvaluator;

#[derive(Clone, Debug, PartialEq)]
pub enum Check {
    SetTo(Value),
    NotSet,
}

/// Assertion about the value found at `path` inside of a stamped object
#[derive(Clone, Debug, PartialEq)]
pub struct Expectation {
    pub path: String,
    pub check: Check,
}

pub struct Field {
    path: String,
}

/// Start an expectation about the field found at the given jsonpath
pub fn field(path: &str) -> Field {
    Field {
        path: path.to_owned(),
    }
}

impl Field {
    pub fn set_to(self, value: impl Into<Value>) -> Expectation {
        Expectation {
            path: self.path,
            check: Check::SetTo(value.into()),
        }
    }

    pub fn not_set(self) -> Expectation {
        Expectation {
            path: self.path,
            check: Check::NotSet,
        }
    }
}

impl Expectation {
    pub fn validate(&self, evaluator: &dyn PathEvaluator, obj: &Value) -> Result<()> {
        match &self.check {
            Check::SetTo(target) => self.check_set_to(evaluator, obj, target),
            Check::NotSet => self.check_not_set(evaluator, obj),
        }
    }

    fn check_set_to(&self, evaluator: &dyn PathEvaluator, obj: &Value, target: &Value) -> Result<()> {
        let res = evaluator
            .evaluate(&self.path, obj)
            .map_err(|e| Error::Evaluate(e.into()))?;

        match diff(target, &res) {
            Some(diff) => Err(Error::Mismatch { diff }),
            None => Ok(()),
        }
    }

    /// The path must not resolve. Only the evaluation failures reporting
    /// that nothing was found satisfy the expectation, any other failure is
    /// returned as is.
    fn check_not_set(&self, evaluator: &dyn PathEvaluator, obj: &Value) -> Result<()> {
        match evaluator.evaluate(&self.path, obj) {
            Ok(_) => Err(Error::UnexpectedlySet(self.path.clone())),
            Err(e) if format!("{e:#}").contains(NO_RESULTS_MESSAGE) => Ok(()),
            Err(e) => Err(Error::Evaluate(e.into())),
        }
    }
}

/// Human readable description of the differences between two objects,
/// `None` when they are equal
pub(crate) fn diff(expected: &Value, actual: &Value) -> Option<String> {
    if expected == actual {
        return None;
    }

    match assert_json_matches_no_panic(expected, actual, Config::new(CompareMode::Strict)) {
        Ok(()) => None,
        Err(diff) => Some(diff),
    }
}
