pub const CARTOGRAPHER_API_GROUP: &str = "carto.run";
pub const CARTOGRAPHER_API_VERSION: &str = "v1alpha1";

/// Name given to the placeholder supply chain and resource of a `Stamper`
pub const PLACEHOLDER_NAME: &str = "<none>";

/// Message fragment produced when a jsonpath query yields nothing
pub const NO_RESULTS_MESSAGE: &str = "failed to find results";
