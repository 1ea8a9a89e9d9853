use crate::inference::domain::tensors::InputTensor;
use crate::shared::constants::{IMAGE_MEAN, IMAGE_STD};
use crate::shared::frame::Frame;

use super::crop_transform::CropTransform;

/// Draw `frame` into `crop` through the frame→crop transform whose
/// inverse is `crop_to_frame`.
///
/// Nearest-neighbour: each crop pixel centre is mapped back into the frame
/// and takes the pixel it lands on. Crop pixels landing outside the frame
/// are black.
pub fn render_crop(frame: &Frame, crop_to_frame: &CropTransform, crop: &mut Frame) {
    let (cw, ch) = (crop.width(), crop.height());
    let (fw, fh) = (frame.width() as f32, frame.height() as f32);
    let out = crop.data_mut();

    for y in 0..ch {
        for x in 0..cw {
            let (sx, sy) = crop_to_frame.map_point(x as f32 + 0.5, y as f32 + 0.5);
            let rgb = if sx >= 0.0 && sy >= 0.0 && sx < fw && sy < fh {
                frame.pixel(sx as u32, sy as u32)
            } else {
                [0, 0, 0]
            };
            let i = (y as usize * cw as usize + x as usize) * 3;
            out[i..i + 3].copy_from_slice(&rgb);
        }
    }
}

/// Encode crop pixels (row-major, RGB) into `tensor`.
///
/// Quantized tensors take the raw channel bytes. Float tensors take
/// `(channel - 127.5) / 127.5`, i.e. values in `[-1, 1]`.
pub fn encode_tensor(crop: &Frame, tensor: &mut InputTensor) {
    let pixels = crop.data();
    debug_assert_eq!(
        pixels.len(),
        tensor.element_count(),
        "crop size must match the input tensor"
    );
    match tensor {
        InputTensor::Quantized(bytes) => bytes.copy_from_slice(pixels),
        InputTensor::Float(values) => {
            for (v, &p) in values.iter_mut().zip(pixels) {
                *v = (p as f32 - IMAGE_MEAN) / IMAGE_STD;
            }
        }
    }
}
