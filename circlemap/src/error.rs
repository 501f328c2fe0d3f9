//! Error types used by the crate.

use thiserror::Error;

/// Circlemap error type.
///
/// Failures of a whole fetch are reported with this type. Problems with individual features of a
/// collection are not errors: such features are skipped.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CircleMapError {
    /// The feed could not be loaded: the request failed or the server answered with a non-success
    /// status.
    #[error("failed to load data: {0}")]
    Network(String),
    /// The feed is not valid JSON or has no `features` array.
    #[error("failed to decode feature collection: {0}")]
    Parse(String),
    /// Configuration values are out of their allowed ranges.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Generic error - details are inside.
    #[error("{0}")]
    Generic(String),
}

impl From<reqwest::Error> for CircleMapError {
    fn from(value: reqwest::Error) -> Self {
        Self::Network(value.to_string())
    }
}

impl From<serde_json::Error> for CircleMapError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}
