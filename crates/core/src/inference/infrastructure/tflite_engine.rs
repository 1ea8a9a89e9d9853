//! TensorFlow Lite engine via the `tflite` crate.
//!
//! Expects an SSD-style detection graph: one input tensor and the four
//! post-processed outputs (locations, classes, scores, count).
use std::mem::size_of;
use std::path::Path;

use tflite::ops::builtin::BuiltinOpResolver;
use tflite::{FlatBufferModel, Interpreter, InterpreterBuilder};

use crate::inference::domain::inference_engine::{EngineFactory, EngineOptions, InferenceEngine};
use crate::inference::domain::inference_error::InferenceError;
use crate::inference::domain::tensors::{InputTensor, OutputTensors};
use crate::shared::constants::NUM_OUTPUTS;

const OUTPUT_NAMES: [&str; NUM_OUTPUTS] = ["locations", "classes", "scores", "count"];

/// A TensorFlow Lite interpreter with its tensors allocated.
pub struct TfliteEngine {
    interpreter: Interpreter<'static, BuiltinOpResolver>,
}

// Safety: the interpreter is only reached through `&mut self`, so it is
// never used from two threads at once.
unsafe impl Send for TfliteEngine {}

impl TfliteEngine {
    fn from_model(model: FlatBufferModel, options: &EngineOptions) -> Result<Self, InferenceError> {
        let builder = InterpreterBuilder::new(model, BuiltinOpResolver::default())?;
        let mut interpreter = builder.build()?;
        if let Some(threads) = options.num_threads {
            interpreter.set_num_threads(threads);
        }
        interpreter.allocate_tensors()?;

        let inputs = interpreter.inputs().len();
        let outputs = interpreter.outputs().len();
        if inputs != 1 || outputs < NUM_OUTPUTS {
            return Err(InferenceError::Engine(
                format!(
                    "expected 1 input and {NUM_OUTPUTS} outputs, model has {inputs} and {outputs}"
                )
                .into(),
            ));
        }
        log::debug!("Interpreter ready: {inputs} input, {outputs} outputs");

        Ok(Self { interpreter })
    }
}

impl InferenceEngine for TfliteEngine {
    fn invoke(
        &mut self,
        input: &InputTensor,
        outputs: &mut OutputTensors,
    ) -> Result<(), InferenceError> {
        let input_index = self.interpreter.inputs()[0];
        match input {
            InputTensor::Quantized(bytes) => {
                let dst: &mut [u8] = self.interpreter.tensor_data_mut(input_index)?;
                copy_checked("input", dst, bytes)?;
            }
            InputTensor::Float(values) => {
                let dst: &mut [f32] = self.interpreter.tensor_data_mut(input_index)?;
                copy_checked("input", dst, values)?;
            }
        }

        self.interpreter.invoke()?;

        let output_indices = self.interpreter.outputs().to_vec();
        for (slot, (&tensor_index, name)) in output_indices.iter().zip(OUTPUT_NAMES).enumerate() {
            let src: &[f32] = self.interpreter.tensor_data(tensor_index)?;
            let dst = outputs.slot_mut(slot).ok_or(InferenceError::ShapeMismatch {
                tensor: name.into(),
                expected: src.len() * size_of::<f32>(),
                actual: 0,
            })?;
            copy_checked(name, dst, src)?;
        }
        Ok(())
    }
}

// Engine tensor on one side, our buffer on the other.
fn copy_checked<T: Copy>(tensor: &str, dst: &mut [T], src: &[T]) -> Result<(), InferenceError> {
    if dst.len() != src.len() {
        return Err(InferenceError::ShapeMismatch {
            tensor: tensor.into(),
            expected: dst.len() * size_of::<T>(),
            actual: src.len() * size_of::<T>(),
        });
    }
    dst.copy_from_slice(src);
    Ok(())
}

/// Builds [`TfliteEngine`]s from `.tflite` files or buffers.
#[derive(Clone, Copy, Debug, Default)]
pub struct TfliteEngineFactory;

impl EngineFactory for TfliteEngineFactory {
    fn from_file(
        &self,
        path: &Path,
        options: &EngineOptions,
    ) -> Result<Box<dyn InferenceEngine>, InferenceError> {
        let model = FlatBufferModel::build_from_file(path)?;
        Ok(Box::new(TfliteEngine::from_model(model, options)?))
    }

    fn from_buffer(
        &self,
        model: Vec<u8>,
        options: &EngineOptions,
    ) -> Result<Box<dyn InferenceEngine>, InferenceError> {
        let model = FlatBufferModel::build_from_buffer(model)?;
        Ok(Box::new(TfliteEngine::from_model(model, options)?))
    }
}
