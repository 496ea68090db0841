//! Question answering over the municipal waste guide website.

use tracing::info;

use crate::embedding::Embedding;
use crate::error::Error;
use crate::request::Client;

mod chunker;
mod index;
mod qa;
mod scrape;

pub use chunker::TextSplitter;
pub use index::{Chunk, VectorIndex};
pub use qa::{Answer, QaChain, DEFAULT_TEMPLATE};
pub use scrape::{extract_text, page_text};

/// Paderborn waste A-Z page.
pub const DEFAULT_URL: &str = "https://www.asp-paderborn.de/abfall-abc/";

/// Default chunk size, characters.
pub const CHUNK_SIZE: usize = 500;

/// Default chunk overlap, characters.
pub const CHUNK_OVERLAP: usize = 50;

/// Default number of chunks retrieved per question.
pub const DEFAULT_TOP_K: usize = 2;

/// Scrape a page, split it into chunks and embed them.
pub fn build_index<E: Embedding>(client: &dyn Client,
    url: &str,
    splitter: &TextSplitter,
    embedder: &E,
    model: &str) -> Result<VectorIndex, Error>
{
    let text = page_text(client, url)?;

    let chunks = splitter.split_text(&text);
    info!("Split {} into {} chunks", url, chunks.len());

    if chunks.is_empty() {
        return Err(Error::Error(format!("no text found at {url}")));
    }

    VectorIndex::build(chunks, embedder, model, url)
}


#[cfg(test)]
mod tests {

    use crate::embedding::stub::StubEmbedding;
    use crate::request::stub::StubClient;

    use super::*;

    #[test]
    fn test_build_index() {
        let client = StubClient::with_page("<html><body><p>Altglas</p><p>Altpapier</p></body></html>");
        let embedder = StubEmbedding::new(&[]).with_fallback(&[1.0, 0.0]);
        let splitter = TextSplitter::new(CHUNK_SIZE, CHUNK_OVERLAP).unwrap();

        let index = build_index(&client, DEFAULT_URL, &splitter, &embedder, "stub").unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.chunks()[0].text, "Altglas\nAltpapier");
        assert_eq!(index.source, DEFAULT_URL);

        let empty = StubClient::with_page("<html><body></body></html>");
        assert!(build_index(&empty, DEFAULT_URL, &splitter, &embedder, "stub").is_err());
    }
}
