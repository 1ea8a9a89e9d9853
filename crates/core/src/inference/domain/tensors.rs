use ndarray::{Array1, Array2, Array3};

use crate::shared::constants::{OUTPUT_CLASSES, OUTPUT_COUNT, OUTPUT_LOCATIONS, OUTPUT_SCORES};

/// The single input tensor, `1 × height × width × 3`.
///
/// Quantized models take raw `u8` channels; float models take normalized
/// `f32` channels in native byte order.
#[derive(Clone, Debug, PartialEq)]
pub enum InputTensor {
    Quantized(Vec<u8>),
    Float(Vec<f32>),
}

impl InputTensor {
    /// A zero-filled tensor holding `elements` channel values.
    pub fn zeroed(elements: usize, quantized: bool) -> Self {
        if quantized {
            InputTensor::Quantized(vec![0; elements])
        } else {
            InputTensor::Float(vec![0.0; elements])
        }
    }

    pub fn is_quantized(&self) -> bool {
        matches!(self, InputTensor::Quantized(_))
    }

    /// Number of channel values (not bytes).
    pub fn element_count(&self) -> usize {
        match self {
            InputTensor::Quantized(b) => b.len(),
            InputTensor::Float(f) => f.len(),
        }
    }

    /// Raw view as handed to the engine.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            InputTensor::Quantized(b) => b,
            InputTensor::Float(f) => bytemuck::cast_slice(f),
        }
    }

    pub fn byte_len(&self) -> usize {
        self.as_bytes().len()
    }
}

/// The four detection output tensors, addressed by fixed position:
///
/// | index | shape       | meaning                                 |
/// |-------|-------------|-----------------------------------------|
/// | 0     | 1 × N × 4   | boxes `(top, left, bottom, right)` in [0,1] |
/// | 1     | 1 × N       | class id                                |
/// | 2     | 1 × N       | score                                   |
/// | 3     | 1           | number of valid detections              |
#[derive(Clone, Debug, PartialEq)]
pub struct OutputTensors {
    pub locations: Array3<f32>,
    pub classes: Array2<f32>,
    pub scores: Array2<f32>,
    pub count: Array1<f32>,
}

impl OutputTensors {
    pub fn new(max_detections: usize) -> Self {
        Self {
            locations: Array3::zeros((1, max_detections, 4)),
            classes: Array2::zeros((1, max_detections)),
            scores: Array2::zeros((1, max_detections)),
            count: Array1::zeros(1),
        }
    }

    pub fn max_detections(&self) -> usize {
        self.classes.shape()[1]
    }

    /// Flat mutable view of the output at `index`, for engines to fill.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut [f32]> {
        match index {
            OUTPUT_LOCATIONS => self.locations.as_slice_mut(),
            OUTPUT_CLASSES => self.classes.as_slice_mut(),
            OUTPUT_SCORES => self.scores.as_slice_mut(),
            OUTPUT_COUNT => self.count.as_slice_mut(),
            _ => None,
        }
    }

    /// Reset every output to zero.
    pub fn clear(&mut self) {
        self.locations.fill(0.0);
        self.classes.fill(0.0);
        self.scores.fill(0.0);
        self.count.fill(0.0);
    }

    /// Detection count as reported by the engine, unclamped.
    pub fn reported_count(&self) -> f32 {
        self.count[0]
    }
}
