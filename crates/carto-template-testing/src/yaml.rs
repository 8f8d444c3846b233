use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::errors::{Error, Result};
use crate::resources::{ClusterSupplyChain, ClusterTemplate, Workload};

/// Normalize a manifest written inline in source code: tabs become four
/// spaces and the indentation shared by all the non empty lines is removed.
pub fn yaml(manifest: &str) -> String {
    let manifest = manifest.replace('\t', "    ");
    let manifest = textwrap::dedent(&manifest);

    match manifest.strip_prefix('\n') {
        Some(stripped) => stripped.to_owned(),
        None => manifest,
    }
}

/// Parse a manifest into an untyped object
pub fn load_yaml(manifest: &str) -> Result<Value> {
    load_typed(manifest)
}

/// Parse a manifest into a typed object
pub fn load_typed<T: DeserializeOwned>(manifest: &str) -> Result<T> {
    serde_yaml::from_str(&yaml(manifest)).map_err(Error::Unmarshal)
}

/// Like `load_yaml`, but panics on malformed fixtures.
/// Meant for test setup only.
pub fn must_unstructured(manifest: &str) -> Value {
    load_yaml(manifest).unwrap_or_else(|e| panic!("unstructured: {e}"))
}

pub fn must_workload(manifest: &str) -> Workload {
    must_typed(manifest)
}

pub fn must_cluster_supply_chain(manifest: &str) -> ClusterSupplyChain {
    must_typed(manifest)
}

pub fn must_cluster_template(manifest: &str) -> ClusterTemplate {
    must_typed(manifest)
}

fn must_typed<T: DeserializeOwned>(manifest: &str) -> T {
    load_typed(manifest).unwrap_or_else(|e| panic!("{e}"))
}

/// Render an object as YAML, used to log stamped objects
pub fn render_yaml<T: Serialize>(obj: &T) -> Result<String> {
    serde_yaml::to_string(obj).map_err(Error::YamlMarshal)
}
