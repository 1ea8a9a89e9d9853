//! Model lifecycle and object detection over TensorFlow Lite.
//!
//! [`ModelHolder`](inference::infrastructure::model_holder::ModelHolder) owns
//! at most one loaded model. [`ObjectDetector`](detection::infrastructure::object_detector::ObjectDetector)
//! turns a frame into an input tensor, runs it through the holder and decodes
//! the four SSD output tensors into recognitions.
pub mod detection;
pub mod inference;
pub mod shared;
