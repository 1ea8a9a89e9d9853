pub mod crop_transform;
pub mod decoding;
pub mod detect_error;
pub mod detector_config;
pub mod preprocessing;
