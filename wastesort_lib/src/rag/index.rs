use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::embedding::Embedding;
use crate::error::Error;
use crate::similarity::rank;

/// Text chunk with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text.
    pub text: String,
    /// Embedding of `text`.
    pub embedding: Vec<f32>,
}

/// In-memory vector index over text chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorIndex {
    /// Embedding model the chunks were embedded with.
    pub model: String,
    /// Where the text came from.
    pub source: String,
    chunks: Vec<Chunk>,
}

impl VectorIndex {

    /// Embed every chunk.
    pub fn build<E: Embedding>(texts: Vec<String>, embedder: &E, model: &str, source: &str) -> Result<Self, Error> {
        let mut chunks = Vec::with_capacity(texts.len());
        for text in texts {
            let embedding = embedder.get_embeddings(&text)?;
            chunks.push(Chunk { text, embedding });
        }

        info!("Vector index built: {} chunks", chunks.len());

        Ok(VectorIndex {
            model: model.to_owned(),
            source: source.to_owned(),
            chunks,
        })
    }

    /// Return up to `k` chunks most similar to the query, best first.
    pub fn search<E: Embedding>(&self, embedder: &E, query: &str, k: usize) -> Result<Vec<(&Chunk, f32)>, Error> {
        let query = embedder.get_embeddings(query)?;

        let ranked = rank(&query, self.chunks.iter().map(|c| c.embedding.as_slice()), k)?;

        Ok(ranked.into_iter().map(|(idx, score)| (&self.chunks[idx], score)).collect())
    }

    /// Chunks in source order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index has no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Write the index as JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;

        info!("Vector index saved to {}", path.display());
        Ok(())
    }

    /// Read an index written by [`VectorIndex::save`].
    pub fn load(path: &Path) -> Result<Self, Error> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(Error::IndexNotFound(path.to_path_buf())),
            Err(err) => return Err(err.into()),
        };

        let index: VectorIndex = serde_json::from_reader(BufReader::new(file))?;

        info!("Vector index loaded from {}: {} chunks", path.display(), index.len());
        Ok(index)
    }
}


#[cfg(test)]
mod tests {

    use crate::embedding::stub::StubEmbedding;

    use super::*;

    fn embedder() -> StubEmbedding {
        StubEmbedding::new(&[
            ("Glass goes into the glass container.", &[1.0, 0.0, 0.0]),
            ("Paper goes into the blue bin.", &[0.0, 1.0, 0.0]),
            ("Batteries go back to the shop.", &[0.0, 0.0, 1.0]),
            ("Where do jam jars go?", &[0.9, 0.2, 0.0]),
        ])
    }

    fn index() -> VectorIndex {
        let texts = vec![
            "Glass goes into the glass container.".to_owned(),
            "Paper goes into the blue bin.".to_owned(),
            "Batteries go back to the shop.".to_owned(),
        ];
        VectorIndex::build(texts, &embedder(), "stub", "https://example.org").unwrap()
    }

    #[test]
    fn test_search() {
        let index = index();
        assert_eq!(index.len(), 3);

        let hits = index.search(&embedder(), "Where do jam jars go?", 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0.text, "Glass goes into the glass container.");
        assert_eq!(hits[1].0.text, "Paper goes into the blue bin.");
        assert!(hits[0].1 > hits[1].1);

        assert!(index.search(&embedder(), "unknown", 2).is_err());
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectorstore").join("index.json");

        let index = index();
        index.save(&path).unwrap();

        let loaded = VectorIndex::load(&path).unwrap();
        assert_eq!(loaded, index);
        assert_eq!(loaded.model, "stub");

        let missing = dir.path().join("missing.json");
        assert!(matches!(VectorIndex::load(&missing), Err(Error::IndexNotFound(_))));
    }
}
