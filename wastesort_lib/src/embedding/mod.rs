//! Sentence embeddings.

use candle_core::Device;

use crate::error::Error;

mod hugface;

#[cfg(test)]
pub mod stub;

pub use hugface::GenEmbeddings;

/// Default sentence embedding model.
pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L12-v2";

/// Default model revision.
pub const DEFAULT_REVISION: &str = "main";

/// Implementations.
pub enum Type {
    /// Hugging Face.
    HuggingFace,
}

/// Embedding generation.
pub trait Embedding {
    /// Return the embeddings for the text.
    fn get_embeddings(&self, text: &str) -> Result<Vec<f32>, Error>;
}

impl<T: Embedding + ?Sized> Embedding for Box<T> {
    fn get_embeddings(&self, text: &str) -> Result<Vec<f32>, Error> {
        (**self).get_embeddings(text)
    }
}

impl<T: Embedding + ?Sized> Embedding for &T {
    fn get_embeddings(&self, text: &str) -> Result<Vec<f32>, Error> {
        (**self).get_embeddings(text)
    }
}

/// Return embedding generator.
pub fn get_embedding(t: Type) -> Result<Box<dyn Embedding>, Error> {
    match t {
        Type::HuggingFace => get_embedding_with(DEFAULT_MODEL, DEFAULT_REVISION),
    }
}

/// Return Hugging Face embedding generator for a specific model.
pub fn get_embedding_with(model_id: &str, revision: &str) -> Result<Box<dyn Embedding>, Error> {
    Ok(Box::new(GenEmbeddings::new(
        model_id.to_string(),
        revision.to_string(),
        false,
        Device::Cpu,
        false
    )?))
}
