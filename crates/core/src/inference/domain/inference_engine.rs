use std::path::Path;

use super::inference_error::InferenceError;
use super::tensors::{InputTensor, OutputTensors};

/// A loaded, ready-to-run model.
///
/// Implementations own the engine's interpreter; dropping the value
/// releases it.
pub trait InferenceEngine: Send {
    /// Copy `input` into the model's input tensor, run the graph, and copy
    /// the four detection outputs into `outputs` by position.
    fn invoke(
        &mut self,
        input: &InputTensor,
        outputs: &mut OutputTensors,
    ) -> Result<(), InferenceError>;
}

/// Per-load interpreter options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Interpreter thread count; the engine default when `None`.
    pub num_threads: Option<i32>,
}

impl EngineOptions {
    pub fn with_threads(num_threads: i32) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }
}

/// Builds engines from model files or in-memory model bytes.
pub trait EngineFactory: Send {
    fn from_file(
        &self,
        path: &Path,
        options: &EngineOptions,
    ) -> Result<Box<dyn InferenceEngine>, InferenceError>;

    fn from_buffer(
        &self,
        model: Vec<u8>,
        options: &EngineOptions,
    ) -> Result<Box<dyn InferenceEngine>, InferenceError>;
}
