pub mod inference_engine;
pub mod inference_error;
pub mod model_source;
pub mod tensors;
