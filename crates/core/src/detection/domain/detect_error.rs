use thiserror::Error;

use crate::inference::domain::inference_error::InferenceError;
use crate::shared::label_map::LabelError;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Labels(#[from] LabelError),
}
