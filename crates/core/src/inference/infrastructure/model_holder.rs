use crate::inference::domain::inference_engine::{EngineFactory, EngineOptions, InferenceEngine};
use crate::inference::domain::inference_error::InferenceError;
use crate::inference::domain::model_source::ModelSource;
use crate::inference::domain::tensors::{InputTensor, OutputTensors};

use super::asset_resolver::AssetResolver;

/// Owns at most one loaded model at a time.
///
/// Loading always releases the current handle before the new one is
/// created, so two engines from the same holder are never alive together.
/// Dropping the holder releases the handle. Every mutating operation takes
/// `&mut self`; share a holder across threads by wrapping it in a `Mutex`.
pub struct ModelHolder {
    factory: Box<dyn EngineFactory>,
    assets: AssetResolver,
    engine: Option<Box<dyn InferenceEngine>>,
}

impl ModelHolder {
    /// Empty holder resolving assets from the user cache directory.
    pub fn new(factory: Box<dyn EngineFactory>) -> Self {
        Self {
            factory,
            assets: AssetResolver::new(),
            engine: None,
        }
    }

    pub fn with_assets(mut self, assets: AssetResolver) -> Self {
        self.assets = assets;
        self
    }

    pub fn load(&mut self, source: ModelSource) -> Result<(), InferenceError> {
        self.load_with_options(source, &EngineOptions::default())
    }

    /// Release the current model, then load `source`.
    ///
    /// On failure the holder is left empty.
    pub fn load_with_options(
        &mut self,
        source: ModelSource,
        options: &EngineOptions,
    ) -> Result<(), InferenceError> {
        self.release();
        log::info!("Loading model from {source}");

        let engine = match source {
            ModelSource::File(path) => self.factory.from_file(&path, options)?,
            ModelSource::Buffer(bytes) => self.factory.from_buffer(bytes, options)?,
            ModelSource::Mapped(bytes) => self.factory.from_buffer(bytes.to_vec(), options)?,
            ModelSource::Asset(name) => {
                let bytes = self.assets.read(&name)?;
                self.factory.from_buffer(bytes, options)?
            }
        };
        self.engine = Some(engine);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }

    /// The current engine. Invalidated by the next `load` or `release`,
    /// which the borrow on `self` enforces.
    pub fn get(&self) -> Option<&dyn InferenceEngine> {
        self.engine.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut (dyn InferenceEngine + 'static)> {
        self.engine.as_deref_mut()
    }

    /// Free the current model, if any.
    pub fn release(&mut self) {
        if self.engine.take().is_some() {
            log::info!("Released model");
        }
    }

    /// Run the loaded model on `input`, filling `outputs`.
    pub fn execute(
        &mut self,
        input: &InputTensor,
        outputs: &mut OutputTensors,
    ) -> Result<(), InferenceError> {
        let engine = self.engine.as_mut().ok_or(InferenceError::NotLoaded)?;
        engine.invoke(input, outputs)
    }
}
