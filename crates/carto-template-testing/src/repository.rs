use kube::api::{Api, ApiResource, DynamicObject, GroupVersionKind};
use tracing::debug;

use crate::constants::{CARTOGRAPHER_API_GROUP, CARTOGRAPHER_API_VERSION};
use crate::errors::{Error, Result};
use crate::resources::ClusterTemplate;

/// Retrieves Cartographer templates from a Kubernetes cluster
pub struct Repository {
    client: kube::Client,
    api_group: String,
    api_version: String,
}

/// Helper struct that creates `Repository` objects
pub struct RepositoryBuilder {
    client: Option<kube::Client>,
    api_group: String,
    api_version: String,
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        RepositoryBuilder {
            client: None,
            api_group: CARTOGRAPHER_API_GROUP.to_owned(),
            api_version: CARTOGRAPHER_API_VERSION.to_owned(),
        }
    }
}

impl RepositoryBuilder {
    pub fn new() -> RepositoryBuilder {
        RepositoryBuilder::default()
    }

    /// Set the `kube::Client` used to reach the cluster. Optional, when not
    /// provided the client is configured from the environment (kubeconfig
    /// or in-cluster service account)
    pub fn client(mut self, client: kube::Client) -> RepositoryBuilder {
        self.client = Some(client);
        self
    }

    pub fn api_group(mut self, group: &str) -> RepositoryBuilder {
        self.api_group = group.to_owned();
        self
    }

    pub fn api_version(mut self, version: &str) -> RepositoryBuilder {
        self.api_version = version.to_owned();
        self
    }

    pub async fn build(self) -> Result<Repository> {
        let client = match self.client {
            Some(client) => client,
            None => kube::Client::try_default()
                .await
                .map_err(Error::KubeClient)?,
        };

        Ok(Repository {
            client,
            api_group: self.api_group,
            api_version: self.api_version,
        })
    }
}

impl Repository {
    pub fn new(client: kube::Client) -> Repository {
        Repository {
            client,
            api_group: CARTOGRAPHER_API_GROUP.to_owned(),
            api_version: CARTOGRAPHER_API_VERSION.to_owned(),
        }
    }

    pub fn builder() -> RepositoryBuilder {
        RepositoryBuilder::new()
    }

    /// Fetch the template of the given `kind` and `name`. Whatever the kind,
    /// the template is decoded as a `ClusterTemplate`: that's all is needed
    /// to stamp it.
    ///
    /// Templates are not cached, each call hits the API server.
    pub async fn get_template(&self, kind: &str, name: &str) -> Result<ClusterTemplate> {
        let gvk = GroupVersionKind::gvk(&self.api_group, &self.api_version, kind);
        let resource = ApiResource::from_gvk(&gvk);
        let api = Api::<DynamicObject>::all_with(self.client.clone(), &resource);

        debug!(
            api_version = resource.api_version.as_str(),
            kind, name, "fetching template"
        );
        let obj = api
            .get_opt(name)
            .await
            .map_err(Error::Get)?
            .ok_or_else(|| Error::NotFound {
                kind: kind.to_owned(),
                name: name.to_owned(),
            })?;

        let value = serde_json::to_value(&obj).map_err(Error::Marshal)?;
        serde_json::from_value(value).map_err(Error::UnmarshalTemplate)
    }
}
