//! Minimal representation of the Cartographer resources involved in the
//! stamping of a template. Only the fields the harness cares about are typed,
//! everything else found inside of `spec` is preserved untouched.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::constants::PLACEHOLDER_NAME;

/// Any of the Cartographer templates (`ClusterSourceTemplate`,
/// `ClusterImageTemplate`, `ClusterConfigTemplate`, `ClusterTemplate`...)
/// reduced to what is needed to stamp it.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: TemplateSpec,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct TemplateSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ytt: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<TemplateParam>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct TemplateParam {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: WorkloadSpec,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct WorkloadSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<OwnerParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Parameter set by the owner of the stamped object
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct OwnerParam {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSupplyChain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: SupplyChainSpec,
}

impl ClusterSupplyChain {
    pub(crate) fn placeholder() -> Self {
        ClusterSupplyChain {
            metadata: ObjectMeta {
                name: Some(PLACEHOLDER_NAME.to_owned()),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct SupplyChainSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<BlueprintParam>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Parameter declared by a supply chain, or by one of its resources
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct BlueprintParam {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl BlueprintParam {
    /// The value this param contributes: `value` wins over `default`
    pub fn effective_value(&self) -> Value {
        self.value
            .as_ref()
            .or(self.default.as_ref())
            .cloned()
            .unwrap_or(Value::Null)
    }
}

/// A resource of a supply chain, the one referencing the template being
/// stamped.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SupplyChainResource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<BlueprintParam>,
}

impl Default for SupplyChainResource {
    fn default() -> Self {
        SupplyChainResource {
            name: PLACEHOLDER_NAME.to_owned(),
            params: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct SourceInput {
    pub name: String,
    pub url: String,
    pub revision: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ImageInput {
    pub name: String,
    pub image: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ConfigInput {
    pub name: String,
    pub config: Value,
}

/// Outputs of the resources a template depends on, indexed by name
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs {
    pub sources: BTreeMap<String, SourceInput>,
    pub images: BTreeMap<String, ImageInput>,
    pub configs: BTreeMap<String, ConfigInput>,
}

impl Inputs {
    pub fn only_source(&self) -> Option<&SourceInput> {
        only(&self.sources)
    }

    pub fn only_image(&self) -> Option<&ImageInput> {
        only(&self.images)
    }

    pub fn only_config(&self) -> Option<&ConfigInput> {
        only(&self.configs)
    }
}

fn only<T>(inputs: &BTreeMap<String, T>) -> Option<&T> {
    match inputs.len() {
        1 => inputs.values().next(),
        _ => None,
    }
}
