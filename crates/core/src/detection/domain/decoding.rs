use crate::inference::domain::tensors::OutputTensors;
use crate::shared::label_map::LabelMap;
use crate::shared::recognition::{BoundingBox, Recognition};

use super::crop_transform::CropTransform;
use super::detector_config::{BoxMapping, DetectorConfig};

/// Number of detections to read: the engine's reported count, truncated,
/// clamped to `[0, max_detections]`.
pub fn detection_count(outputs: &OutputTensors, max_detections: usize) -> usize {
    let reported = outputs.reported_count();
    if !reported.is_finite() || reported < 1.0 {
        return 0;
    }
    let max = max_detections.min(outputs.max_detections());
    let count = reported as usize;
    if count > max {
        log::warn!("Engine reported {count} detections, keeping the first {max}");
    }
    count.min(max)
}

/// Turn raw output tensors into recognitions, in engine output order.
///
/// Boxes arrive as normalized `(top, left, bottom, right)`. Under
/// [`BoxMapping::InputWidth`] all four are scaled by the input width;
/// under [`BoxMapping::SourceFrame`] they are scaled to crop pixels and
/// mapped through `crop_to_frame`.
pub fn decode_recognitions(
    outputs: &OutputTensors,
    config: &DetectorConfig,
    crop_to_frame: &CropTransform,
    labels: Option<&LabelMap>,
) -> Vec<Recognition> {
    let count = detection_count(outputs, config.max_detections());
    let w = config.input_width() as f32;
    let h = config.input_height() as f32;

    (0..count)
        .map(|i| {
            let top = outputs.locations[[0, i, 0]];
            let left = outputs.locations[[0, i, 1]];
            let bottom = outputs.locations[[0, i, 2]];
            let right = outputs.locations[[0, i, 3]];

            let location = match config.box_mapping() {
                BoxMapping::InputWidth => {
                    BoundingBox::new(left * w, top * w, right * w, bottom * w)
                }
                BoxMapping::SourceFrame => crop_to_frame
                    .map_box(&BoundingBox::new(left * w, top * h, right * w, bottom * h)),
            };

            let class_id = outputs.classes[[0, i]] as i32;
            Recognition {
                class_id,
                title: labels
                    .and_then(|l| l.get(class_id))
                    .unwrap_or_default()
                    .to_string(),
                score: outputs.scores[[0, i]],
                location,
            }
        })
        .collect()
}
