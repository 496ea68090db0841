//! Only for tests.

use std::collections::HashMap;

use crate::error::Error;

use super::Embedding;

/// Embedder for tests: fixed vectors per text.
pub struct StubEmbedding {
    vectors: HashMap<String, Vec<f32>>,
    fallback: Option<Vec<f32>>,
}

impl StubEmbedding {

    /// Create embedder with known texts.
    pub fn new(vectors: &[(&str, &[f32])]) -> Self {
        StubEmbedding {
            vectors: vectors.iter().map(|(k, v)| (k.to_string(), v.to_vec())).collect(),
            fallback: None,
        }
    }

    /// Vector returned for unknown texts.
    pub fn with_fallback(mut self, fallback: &[f32]) -> Self {
        self.fallback = Some(fallback.to_vec());
        self
    }
}

impl Embedding for StubEmbedding {

    fn get_embeddings(&self, text: &str) -> Result<Vec<f32>, Error> {
        self.vectors.get(text)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or(Error::ForTests("unknown text"))
    }
}
