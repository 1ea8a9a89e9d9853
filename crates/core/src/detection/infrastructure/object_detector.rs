//! Object detector over an SSD-style model held by a [`ModelHolder`].
//!
//! Handles the crop transform, bitmap rendering, tensor encoding, inference
//! through the holder, and decoding of the four output tensors.
use std::path::Path;

use crate::detection::domain::crop_transform::CropTransform;
use crate::detection::domain::decoding::decode_recognitions;
use crate::detection::domain::detect_error::DetectError;
use crate::detection::domain::detector_config::DetectorConfig;
use crate::detection::domain::preprocessing::{encode_tensor, render_crop};
use crate::inference::domain::tensors::{InputTensor, OutputTensors};
use crate::inference::infrastructure::model_holder::ModelHolder;
use crate::shared::frame::Frame;
use crate::shared::label_map::LabelMap;
use crate::shared::recognition::Recognition;

/// Detection adapter with scratch buffers sized once from its config.
///
/// Usable two ways: stage a frame with [`set_frame`](Self::set_frame) and
/// call [`run`](Self::run), or call [`detect`](Self::detect) directly.
/// Not reentrant: one run at a time per detector, which `&mut self` enforces.
pub struct ObjectDetector {
    config: DetectorConfig,
    labels: Option<LabelMap>,
    frame: Option<(Frame, i32)>,
    transform: Option<CropTransform>,
    crop: Frame,
    input: InputTensor,
    outputs: OutputTensors,
}

impl ObjectDetector {
    pub fn new(config: DetectorConfig) -> Self {
        let crop = Frame::black(config.input_width(), config.input_height());
        let input = InputTensor::zeroed(config.tensor_elements(), config.quantized());
        let outputs = OutputTensors::new(config.max_detections());
        log::debug!(
            "Detector buffers: {}x{} crop, {} input bytes, {} detections",
            config.input_width(),
            config.input_height(),
            input.byte_len(),
            config.max_detections()
        );
        Self {
            config,
            labels: None,
            frame: None,
            transform: None,
            crop,
            input,
            outputs,
        }
    }

    pub fn with_labels(mut self, labels: LabelMap) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn with_label_file(self, path: &Path) -> Result<Self, DetectError> {
        Ok(self.with_labels(LabelMap::load(path)?))
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// The tensor encoded by the most recent run.
    pub fn input(&self) -> &InputTensor {
        &self.input
    }

    /// Stage a frame for the next [`run`](Self::run).
    pub fn set_frame(&mut self, frame: Frame, rotation_degrees: i32) -> &mut Self {
        self.frame = Some((frame, rotation_degrees));
        self
    }

    /// Stage the caller's frame transform. [`run`](Self::run) requires one,
    /// but renders through a transform derived from the frame size and
    /// rotation. The staged transform stays set across runs.
    pub fn set_transform(&mut self, transform: CropTransform) -> &mut Self {
        self.transform = Some(transform);
        self
    }

    pub fn has_frame(&self) -> bool {
        self.frame.is_some()
    }

    pub fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    /// Detect on the staged frame, consuming it.
    ///
    /// Returns `Ok(None)` without running inference when no frame or no
    /// transform is staged, or when the frame is empty.
    pub fn run(
        &mut self,
        holder: &mut ModelHolder,
    ) -> Result<Option<Vec<Recognition>>, DetectError> {
        if self.transform.is_none() {
            log::debug!("Skipping detection: no transform set");
            return Ok(None);
        }
        let Some((frame, rotation)) = self.frame.take() else {
            log::debug!("Skipping detection: no frame set");
            return Ok(None);
        };
        let frame_to_crop = self.frame_to_crop(&frame, rotation);
        self.infer(holder, &frame, &frame_to_crop)
    }

    /// One-shot detection on `frame`; empty when the frame cannot be used.
    pub fn detect(
        &mut self,
        holder: &mut ModelHolder,
        frame: &Frame,
        rotation_degrees: i32,
    ) -> Result<Vec<Recognition>, DetectError> {
        let transform = self.frame_to_crop(frame, rotation_degrees);
        Ok(self.infer(holder, frame, &transform)?.unwrap_or_default())
    }

    fn frame_to_crop(&self, frame: &Frame, rotation_degrees: i32) -> CropTransform {
        CropTransform::frame_to_crop(
            frame.width(),
            frame.height(),
            self.config.input_width(),
            self.config.input_height(),
            rotation_degrees,
            false,
        )
    }

    fn infer(
        &mut self,
        holder: &mut ModelHolder,
        frame: &Frame,
        frame_to_crop: &CropTransform,
    ) -> Result<Option<Vec<Recognition>>, DetectError> {
        if frame.is_empty() {
            log::debug!("Skipping detection: empty frame");
            return Ok(None);
        }
        let Some(crop_to_frame) = frame_to_crop.invert() else {
            log::debug!("Skipping detection: transform is not invertible");
            return Ok(None);
        };

        // 1. Render + encode
        render_crop(frame, &crop_to_frame, &mut self.crop);
        encode_tensor(&self.crop, &mut self.input);

        // 2. Inference
        self.outputs.clear();
        holder.execute(&self.input, &mut self.outputs)?;

        // 3. Decode
        let recognitions = decode_recognitions(
            &self.outputs,
            &self.config,
            &crop_to_frame,
            self.labels.as_ref(),
        );
        log::debug!(
            "Detected {} objects in {}x{} frame",
            recognitions.len(),
            frame.width(),
            frame.height()
        );
        Ok(Some(recognitions))
    }
}
