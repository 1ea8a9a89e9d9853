use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::inference::domain::inference_engine::{EngineFactory, EngineOptions, InferenceEngine};
use crate::inference::domain::inference_error::InferenceError;
use crate::inference::domain::tensors::{InputTensor, OutputTensors};

/// What the fixed-output engines built by one factory have observed.
#[derive(Debug, Default)]
pub struct EngineProbe {
    /// Engines created and not yet dropped.
    pub live_handles: usize,
    /// Engines created over the factory's lifetime.
    pub created: usize,
    pub invocations: usize,
    pub last_input: Option<InputTensor>,
    pub last_options: Option<EngineOptions>,
}

/// Replays pre-computed detection outputs regardless of input.
///
/// Used to exercise the detection adapter without a real model: every
/// invocation records its input and copies the same outputs back.
pub struct FixedOutputEngine {
    outputs: OutputTensors,
    probe: Arc<Mutex<EngineProbe>>,
}

impl InferenceEngine for FixedOutputEngine {
    fn invoke(
        &mut self,
        input: &InputTensor,
        outputs: &mut OutputTensors,
    ) -> Result<(), InferenceError> {
        if outputs.max_detections() != self.outputs.max_detections() {
            return Err(InferenceError::ShapeMismatch {
                tensor: "locations".into(),
                expected: self.outputs.locations.len() * 4,
                actual: outputs.locations.len() * 4,
            });
        }
        outputs.clone_from(&self.outputs);

        let mut probe = lock(&self.probe);
        probe.invocations += 1;
        probe.last_input = Some(input.clone());
        Ok(())
    }
}

impl Drop for FixedOutputEngine {
    fn drop(&mut self) {
        lock(&self.probe).live_handles -= 1;
    }
}

/// Creates [`FixedOutputEngine`]s sharing one set of outputs and one probe.
///
/// File sources must be readable and buffers non-empty, so load failures
/// surface the same way they would with a real engine.
#[derive(Clone)]
pub struct FixedOutputFactory {
    outputs: OutputTensors,
    probe: Arc<Mutex<EngineProbe>>,
}

impl FixedOutputFactory {
    pub fn new(outputs: OutputTensors) -> Self {
        Self {
            outputs,
            probe: Arc::new(Mutex::new(EngineProbe::default())),
        }
    }

    /// Outputs reporting `count` detections; `detections` fills the
    /// leading slots as `([top, left, bottom, right], class, score)`.
    pub fn with_detections(
        max_detections: usize,
        count: f32,
        detections: &[([f32; 4], f32, f32)],
    ) -> Self {
        let mut outputs = OutputTensors::new(max_detections);
        for (i, (bbox, class, score)) in detections.iter().take(max_detections).enumerate() {
            for (k, v) in bbox.iter().enumerate() {
                outputs.locations[[0, i, k]] = *v;
            }
            outputs.classes[[0, i]] = *class;
            outputs.scores[[0, i]] = *score;
        }
        outputs.count[0] = count;
        Self::new(outputs)
    }

    pub fn probe(&self) -> MutexGuard<'_, EngineProbe> {
        lock(&self.probe)
    }

    fn build(&self, options: &EngineOptions) -> Box<dyn InferenceEngine> {
        let mut probe = lock(&self.probe);
        probe.live_handles += 1;
        probe.created += 1;
        probe.last_options = Some(options.clone());
        Box::new(FixedOutputEngine {
            outputs: self.outputs.clone(),
            probe: Arc::clone(&self.probe),
        })
    }
}

impl EngineFactory for FixedOutputFactory {
    fn from_file(
        &self,
        path: &Path,
        options: &EngineOptions,
    ) -> Result<Box<dyn InferenceEngine>, InferenceError> {
        let model = fs::read(path).map_err(|e| InferenceError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.from_buffer(model, options)
    }

    fn from_buffer(
        &self,
        model: Vec<u8>,
        options: &EngineOptions,
    ) -> Result<Box<dyn InferenceEngine>, InferenceError> {
        if model.is_empty() {
            return Err(InferenceError::Engine("empty model buffer".into()));
        }
        Ok(self.build(options))
    }
}

// A panic while holding the probe only poisons bookkeeping; keep reading it.
fn lock(probe: &Mutex<EngineProbe>) -> MutexGuard<'_, EngineProbe> {
    probe.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
