//! Helpers to unit test Cartographer templates: fetch a template, stamp it
//! on behalf of a workload and make assertions about the stamped object.
//!
//! The engine rendering the templates is provided by the caller through the
//! `TemplateEngine` trait.

pub mod case;
pub mod constants;
pub mod errors;
pub mod expectations;
pub mod jsonpath;
pub mod params;
pub mod repository;
pub mod resources;
pub mod stamper;
pub mod suite;
pub mod yaml;

pub use case::{CaseFailure, TestCase};
pub use errors::{Error, Result};
pub use expectations::{Expectation, field};
pub use jsonpath::{FieldPathEvaluator, PathEvaluator};
pub use repository::{Repository, RepositoryBuilder};
pub use stamper::{Stamp, Stamper, TemplateEngine, TemplatingContext};
pub use suite::{CaseOutcome, SuiteReport, TestSuite};

pub use k8s_openapi;
pub use kube;
