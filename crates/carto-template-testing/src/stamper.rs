use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::errors::{Error, Result};
use crate::params::{Params, build_params};
use crate::resources::{
    ClusterSupplyChain, ClusterTemplate, ConfigInput, ImageInput, Inputs, SourceInput,
    SupplyChainResource, TemplateSpec, Workload,
};

/// The engine rendering a template spec into a concrete object, given the
/// owner of the object and the templating context.
pub trait TemplateEngine: Send + Sync {
    fn stamp(
        &self,
        owner: &Value,
        context: &TemplatingContext,
        spec: &TemplateSpec,
    ) -> anyhow::Result<Value>;
}

impl<F> TemplateEngine for F
where
    F: Fn(&Value, &TemplatingContext, &TemplateSpec) -> anyhow::Result<Value> + Send + Sync,
{
    fn stamp(
        &self,
        owner: &Value,
        context: &TemplatingContext,
        spec: &TemplateSpec,
    ) -> anyhow::Result<Value> {
        self(owner, context, spec)
    }
}

/// Produces the object a test case makes assertions against
pub trait Stamp: Send + Sync {
    fn stamp(&self, engine: &dyn TemplateEngine, template: &ClusterTemplate) -> Result<Value>;
}

/// Data made available to a template while it's being stamped. When exactly
/// one input of a kind is available, it's also exposed through the singular
/// `source`, `image` and `config` keys.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct TemplatingContext {
    pub workload: Value,
    pub params: Params,
    pub sources: BTreeMap<String, SourceInput>,
    pub images: BTreeMap<String, ImageInput>,
    pub configs: BTreeMap<String, ConfigInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ConfigInput>,
}

impl TemplatingContext {
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::Marshal)
    }
}

/// Builder of the templating context used to stamp a template.
///
/// A placeholder supply chain and supply chain resource are provided, so
/// only the workload has to be given.
#[derive(Clone, Debug)]
pub struct Stamper {
    workload: Option<Workload>,
    supply_chain: Option<ClusterSupplyChain>,
    resource: Option<SupplyChainResource>,
    inputs: Inputs,
}

impl Default for Stamper {
    fn default() -> Self {
        Stamper {
            workload: None,
            supply_chain: Some(ClusterSupplyChain::placeholder()),
            resource: Some(SupplyChainResource::default()),
            inputs: Inputs::default(),
        }
    }
}

impl Stamper {
    pub fn new() -> Stamper {
        Stamper::default()
    }

    pub fn workload(mut self, workload: impl Into<Option<Workload>>) -> Stamper {
        self.workload = workload.into();
        self
    }

    pub fn supply_chain(mut self, supply_chain: impl Into<Option<ClusterSupplyChain>>) -> Stamper {
        self.supply_chain = supply_chain.into();
        self
    }

    /// Set the supply chain resource referencing the template, and with it
    /// the resource level params
    pub fn resource(mut self, resource: SupplyChainResource) -> Stamper {
        self.resource = Some(resource);
        self
    }

    pub fn source(mut self, name: &str, url: &str, revision: &str) -> Stamper {
        self.inputs.sources.insert(
            name.to_owned(),
            SourceInput {
                name: name.to_owned(),
                url: url.to_owned(),
                revision: revision.to_owned(),
            },
        );
        self
    }

    pub fn image(mut self, name: &str, image: &str) -> Stamper {
        self.inputs.images.insert(
            name.to_owned(),
            ImageInput {
                name: name.to_owned(),
                image: image.to_owned(),
            },
        );
        self
    }

    pub fn config(mut self, name: &str, config: Value) -> Stamper {
        self.inputs.configs.insert(
            name.to_owned(),
            ConfigInput {
                name: name.to_owned(),
                config,
            },
        );
        self
    }

    fn validate(&self) -> Result<(&Workload, &ClusterSupplyChain, &SupplyChainResource)> {
        let workload = self
            .workload
            .as_ref()
            .ok_or_else(|| Error::Validate("workload must be set".to_owned()))?;
        let supply_chain = self
            .supply_chain
            .as_ref()
            .ok_or_else(|| Error::Validate("supplychain must be set".to_owned()))?;
        let resource = self
            .resource
            .as_ref()
            .ok_or_else(|| Error::Validate("resource must be set".to_owned()))?;

        Ok((workload, supply_chain, resource))
    }

    pub fn templating_context(&self, template: &ClusterTemplate) -> Result<TemplatingContext> {
        let (workload, supply_chain, resource) = self.validate()?;

        Ok(TemplatingContext {
            workload: serde_json::to_value(workload).map_err(Error::Marshal)?,
            params: build_params(
                &template.spec.params,
                &supply_chain.spec.params,
                &resource.params,
                &workload.spec.params,
            ),
            sources: self.inputs.sources.clone(),
            images: self.inputs.images.clone(),
            configs: self.inputs.configs.clone(),
            source: self.inputs.only_source().cloned(),
            image: self.inputs.only_image().cloned(),
            config: self.inputs.only_config().cloned(),
        })
    }

    pub fn stamp(&self, engine: &dyn TemplateEngine, template: &ClusterTemplate) -> Result<Value> {
        let context = self.templating_context(template)?;
        debug!(
            template = template.metadata.name.as_deref().unwrap_or_default(),
            params = ?context.params,
            "stamping template"
        );

        engine
            .stamp(&context.workload, &context, &template.spec)
            .map_err(|e| Error::Stamp(e.into()))
    }
}

impl Stamp for Stamper {
    fn stamp(&self, engine: &dyn TemplateEngine, template: &ClusterTemplate) -> Result<Value> {
        Stamper::stamp(self, engine, template)
    }
}
