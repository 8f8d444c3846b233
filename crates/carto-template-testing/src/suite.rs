use rayon::prelude::*;
use std::fmt;
use tracing::{info, info_span, warn};

use crate::case::{CaseFailure, TestCase};
use crate::errors::Result;
use crate::jsonpath::{FieldPathEvaluator, PathEvaluator};
use crate::repository::Repository;
use crate::resources::ClusterTemplate;
use crate::stamper::TemplateEngine;

/// A template together with the test cases exercising it. Cases are
/// independent from each other: the failure of one of them doesn't prevent
/// the others from running.
pub struct TestSuite {
    pub name: String,
    pub template: ClusterTemplate,
    pub cases: Vec<TestCase>,
    evaluator: Box<dyn PathEvaluator>,
}

impl TestSuite {
    pub fn new(template: ClusterTemplate) -> TestSuite {
        TestSuite {
            name: template.metadata.name.clone().unwrap_or_default(),
            template,
            cases: Vec::new(),
            evaluator: Box::new(FieldPathEvaluator),
        }
    }

    /// Create a suite for the template of the given kind and name, as found
    /// inside of the cluster
    pub async fn from_cluster(repository: &Repository, kind: &str, name: &str) -> Result<TestSuite> {
        let template = repository.get_template(kind, name).await?;
        Ok(TestSuite::new(template).name(&format!("{kind}/{name}")))
    }

    pub fn name(mut self, name: &str) -> TestSuite {
        self.name = name.to_owned();
        self
    }

    pub fn case(mut self, case: TestCase) -> TestSuite {
        self.cases.push(case);
        self
    }

    /// Use a different jsonpath evaluator for the field expectations
    pub fn with_evaluator(mut self, evaluator: impl PathEvaluator + 'static) -> TestSuite {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Run all the cases, one after the other
    pub fn run(&self, engine: &dyn TemplateEngine) -> SuiteReport {
        let outcomes = self
            .cases
            .iter()
            .map(|case| self.run_case(case, engine))
            .collect();

        SuiteReport {
            suite: self.name.clone(),
            outcomes,
        }
    }

    /// Run all the cases concurrently. Outcomes are still reported in the
    /// order the cases have been declared.
    pub fn run_parallel(&self, engine: &dyn TemplateEngine) -> SuiteReport {
        let outcomes = self
            .cases
            .par_iter()
            .map(|case| self.run_case(case, engine))
            .collect();

        SuiteReport {
            suite: self.name.clone(),
            outcomes,
        }
    }

    fn run_case(&self, case: &TestCase, engine: &dyn TemplateEngine) -> CaseOutcome {
        let span = info_span!("test_case", suite = self.name.as_str(), case = case.name.as_str());
        let _enter = span.enter();

        let result = case.run(engine, self.evaluator.as_ref(), &self.template);
        match &result {
            Ok(()) => info!("passed"),
            Err(failure) => warn!(error = %failure, "failed"),
        }

        CaseOutcome {
            name: case.name.clone(),
            result,
        }
    }
}

#[derive(Debug)]
pub struct CaseOutcome {
    pub name: String,
    pub result: std::result::Result<(), CaseFailure>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
pub struct SuiteReport {
    pub suite: String,
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(CaseOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    pub fn outcome(&self, case: &str) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|o| o.name == case)
    }

    /// Panics when at least one of the cases failed, listing all of them.
    /// Meant to be called at the end of a `#[test]` function.
    pub fn assert_passed(&self) {
        if !self.passed() {
            panic!("{self}");
        }
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let failed = self.failures().count();
        write!(
            f,
            "suite '{}': {} of {} cases failed",
            self.suite,
            failed,
            self.outcomes.len()
        )?;
        for outcome in self.failures() {
            if let Err(failure) = &outcome.result {
                write!(f, "\n--- {}: {}", outcome.name, failure)?;
            }
        }
        Ok(())
    }
}
