use std::path::PathBuf;

use thiserror::Error;

/// Failures reported while loading a model or running inference.
///
/// Engine-side failures are carried unchanged in [`InferenceError::Engine`].
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("no model is loaded")]
    NotLoaded,
    #[error("failed to read model from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model asset not found: {0}")]
    AssetNotFound(String),
    #[error("tensor {tensor} holds {expected} bytes, buffer has {actual}")]
    ShapeMismatch {
        tensor: String,
        expected: usize,
        actual: usize,
    },
    #[error("inference engine error: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "tflite")]
impl From<tflite::Error> for InferenceError {
    fn from(e: tflite::Error) -> Self {
        InferenceError::Engine(Box::new(e))
    }
}
