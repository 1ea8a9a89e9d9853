/// Default model input edge, in pixels (SSD MobileNet convention).
pub const DEFAULT_INPUT_SIZE: u32 = 300;

pub const DEFAULT_MAX_DETECTIONS: usize = 10;

/// Float models expect `(channel - IMAGE_MEAN) / IMAGE_STD`.
pub const IMAGE_MEAN: f32 = 127.5;
pub const IMAGE_STD: f32 = 127.5;

/// Positional contract of the detection model's output tensors.
pub const OUTPUT_LOCATIONS: usize = 0;
pub const OUTPUT_CLASSES: usize = 1;
pub const OUTPUT_SCORES: usize = 2;
pub const OUTPUT_COUNT: usize = 3;
pub const NUM_OUTPUTS: usize = 4;

/// Name of the per-user directory searched for packaged model assets.
pub const APP_DIR_NAME: &str = "litedet";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
