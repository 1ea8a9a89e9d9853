pub mod asset_resolver;
pub mod fixed_output_engine;
pub mod model_holder;
#[cfg(feature = "tflite")]
pub mod tflite_engine;
