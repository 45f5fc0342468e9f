use thiserror::Error;

use crate::point::PointId;

/// Top-level error type for the point locator.
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Reasons a point could not be given a position.
///
/// None of these are fatal: callers report them through a
/// [`StatusSink`](crate::status::StatusSink) and stay interactive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The model (and therefore its bounding box) has not finished loading.
    #[error("model is not ready")]
    ModelNotReady,

    /// No alias matched an indexed node and coordinate fallback was not
    /// permitted for this request.
    #[error("no node found for {id} (coordinate fallback blocked)")]
    NodeUnresolved { id: PointId, aliases: Vec<String> },

    /// Neither a node nor a coordinate is available.
    #[error("no node or coordinate for {id}")]
    NoPositionData { id: PointId },
}

/// Errors related to the loaded model's node tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("node not found: {0}")]
    NodeNotFound(String),
}

/// Errors raised while reading data-provider records.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed {document}: {source}")]
    Parse {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors related to locator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors reported by the render host while loading a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("failed to load model: {0}")]
    Failed(String),

    #[error("model load already in progress")]
    InProgress,

    #[error("no model load in progress")]
    NotLoading,

    #[error("model load already finished")]
    AlreadyFinished,
}

/// Convenience type alias for results using [`LocatorError`].
pub type Result<T> = std::result::Result<T, LocatorError>;
