use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by engines and evaluators plugged into the harness
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("validate: {0}")]
    Validate(String),

    #[error("new default client: {0}")]
    KubeClient(#[source] kube::Error),

    #[error("get: {0}")]
    Get(#[source] kube::Error),

    #[error("get: {kind} \"{name}\" not found")]
    NotFound { kind: String, name: String },

    #[error("marshal: {0}")]
    Marshal(#[source] serde_json::Error),

    #[error("unmarshal to clustertemplate: {0}")]
    UnmarshalTemplate(#[source] serde_json::Error),

    #[error("unmarshal: {0}")]
    Unmarshal(#[source] serde_yaml::Error),

    #[error("yaml marshal: {0}")]
    YamlMarshal(#[source] serde_yaml::Error),

    #[error("stamp: {0}")]
    Stamp(#[source] BoxError),

    #[error("evaluate: {0}")]
    Evaluate(#[source] BoxError),

    #[error("expected jsonpath evaluation of \"{0}\" to fail, but didn't")]
    UnexpectedlySet(String),

    #[error("(-expected, +actual) = {diff}")]
    Mismatch { diff: String },
}

impl Error {
    /// True when the template lookup failed because the object does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Get(kube::Error::Api(response)) => response.code == 404,
            _ => false,
        }
    }
}
