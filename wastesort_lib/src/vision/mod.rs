//! Image classification.

use std::path::Path;

use candle_core::Device;

use crate::error::Error;

mod vit;

pub use vit::VitClassifier;

/// Default image classification model.
pub const DEFAULT_MODEL: &str = "google/vit-base-patch16-224";

/// Image classification.
pub trait Classifier {
    /// Return the most likely label for the image.
    fn classify(&self, image: &Path) -> Result<String, Error>;
}

/// Return ViT classifier for the model.
pub fn get_classifier(model_id: &str) -> Result<Box<dyn Classifier>, Error> {
    Ok(Box::new(VitClassifier::new(model_id.to_string(), Device::Cpu)?))
}
