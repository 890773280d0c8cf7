//! Scene configuration and render setup errors.

use thiserror::Error;

/// A scene that cannot be indexed for traversal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("primitive {index} has no bounding box")]
    MissingBoundingBox { index: usize },

    #[error("primitive {index} has non-finite bounds")]
    NonFiniteBounds { index: usize },
}

/// Failure to set up a render before any pixel is traced.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("render config field `{field}` must be greater than zero")]
    ZeroField { field: &'static str },
}
