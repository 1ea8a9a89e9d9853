use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{DEFAULT_INPUT_SIZE, DEFAULT_MAX_DETECTIONS};
use crate::shared::frame::RGB_CHANNELS;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("input size must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
    #[error("max detections must be at least 1")]
    ZeroDetections,
}

/// How normalized output boxes become pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxMapping {
    /// Every coordinate scaled by the input width, in crop space.
    #[default]
    InputWidth,
    /// Crop-space box mapped through the inverse crop transform into
    /// source-frame pixels.
    SourceFrame,
}

/// Immutable detector settings, validated on construction and on
/// deserialize. Drives the size of every scratch buffer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFields")]
pub struct DetectorConfig {
    input_width: u32,
    input_height: u32,
    quantized: bool,
    max_detections: usize,
    box_mapping: BoxMapping,
}

impl DetectorConfig {
    pub fn new(
        input_width: u32,
        input_height: u32,
        quantized: bool,
        max_detections: usize,
    ) -> Result<Self, ConfigError> {
        if input_width == 0 || input_height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: input_width,
                height: input_height,
            });
        }
        if max_detections == 0 {
            return Err(ConfigError::ZeroDetections);
        }
        Ok(Self {
            input_width,
            input_height,
            quantized,
            max_detections,
            box_mapping: BoxMapping::default(),
        })
    }

    /// Square `size × size` input.
    pub fn square(size: u32, quantized: bool, max_detections: usize) -> Result<Self, ConfigError> {
        Self::new(size, size, quantized, max_detections)
    }

    pub fn with_box_mapping(mut self, box_mapping: BoxMapping) -> Self {
        self.box_mapping = box_mapping;
        self
    }

    pub fn input_width(&self) -> u32 {
        self.input_width
    }

    pub fn input_height(&self) -> u32 {
        self.input_height
    }

    pub fn quantized(&self) -> bool {
        self.quantized
    }

    pub fn max_detections(&self) -> usize {
        self.max_detections
    }

    pub fn box_mapping(&self) -> BoxMapping {
        self.box_mapping
    }

    /// Channel values in the input tensor (`width × height × 3`).
    pub fn tensor_elements(&self) -> usize {
        self.input_width as usize * self.input_height as usize * RGB_CHANNELS
    }

    /// Size of the encoded input tensor in bytes.
    pub fn tensor_bytes(&self) -> usize {
        let per_channel = if self.quantized { 1 } else { 4 };
        self.tensor_elements() * per_channel
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            input_width: DEFAULT_INPUT_SIZE,
            input_height: DEFAULT_INPUT_SIZE,
            quantized: true,
            max_detections: DEFAULT_MAX_DETECTIONS,
            box_mapping: BoxMapping::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct ConfigFields {
    input_width: u32,
    input_height: u32,
    quantized: bool,
    max_detections: usize,
    box_mapping: BoxMapping,
}

impl Default for ConfigFields {
    fn default() -> Self {
        let d = DetectorConfig::default();
        Self {
            input_width: d.input_width,
            input_height: d.input_height,
            quantized: d.quantized,
            max_detections: d.max_detections,
            box_mapping: d.box_mapping,
        }
    }
}

impl TryFrom<ConfigFields> for DetectorConfig {
    type Error = ConfigError;

    fn try_from(f: ConfigFields) -> Result<Self, Self::Error> {
        Ok(
            DetectorConfig::new(f.input_width, f.input_height, f.quantized, f.max_detections)?
                .with_box_mapping(f.box_mapping),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_matches_ssd_mobilenet() {
        let c = DetectorConfig::default();
        assert_eq!((c.input_width(), c.input_height()), (300, 300));
        assert!(c.quantized());
        assert_eq!(c.max_detections(), 10);
        assert_eq!(c.box_mapping(), BoxMapping::InputWidth);
    }

    #[test]
    fn test_square_sets_both_dimensions() {
        let c = DetectorConfig::square(320, false, 25).unwrap();
        assert_eq!((c.input_width(), c.input_height()), (320, 320));
        assert!(!c.quantized());
        assert_eq!(c.max_detections(), 25);
    }

    #[rstest]
    #[case::zero_width(0, 300)]
    #[case::zero_height(300, 0)]
    fn test_zero_dimension_rejected(#[case] w: u32, #[case] h: u32) {
        assert_eq!(
            DetectorConfig::new(w, h, true, 10),
            Err(ConfigError::ZeroDimension {
                width: w,
                height: h
            })
        );
    }

    #[test]
    fn test_zero_detections_rejected() {
        assert_eq!(
            DetectorConfig::new(300, 300, true, 0),
            Err(ConfigError::ZeroDetections)
        );
    }

    #[rstest]
    #[case::quantized(true, 300 * 300 * 3)]
    #[case::float(false, 300 * 300 * 3 * 4)]
    fn test_tensor_bytes(#[case] quantized: bool, #[case] expected: usize) {
        let c = DetectorConfig::square(300, quantized, 10).unwrap();
        assert_eq!(c.tensor_bytes(), expected);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let c: DetectorConfig = serde_json::from_str(r#"{"quantized": false}"#).unwrap();
        assert_eq!(c.input_width(), 300);
        assert!(!c.quantized());
    }

    #[test]
    fn test_deserialize_box_mapping() {
        let c: DetectorConfig =
            serde_json::from_str(r#"{"input_width": 640, "box_mapping": "source_frame"}"#).unwrap();
        assert_eq!(c.input_width(), 640);
        assert_eq!(c.box_mapping(), BoxMapping::SourceFrame);
    }

    #[test]
    fn test_deserialize_validates() {
        let err = serde_json::from_str::<DetectorConfig>(r#"{"max_detections": 0}"#).unwrap_err();
        assert!(err.to_string().contains("max detections"));
    }

    #[test]
    fn test_serialize_roundtrip_keeps_mapping() {
        let c = DetectorConfig::new(300, 200, false, 5)
            .unwrap()
            .with_box_mapping(BoxMapping::SourceFrame);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(serde_json::from_str::<DetectorConfig>(&json).unwrap(), c);
    }
}
