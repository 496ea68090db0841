use tracing::debug;

use crate::embedding::Embedding;
use crate::error::Error;
use crate::llm::Llm;

use super::VectorIndex;

/// Default question answering prompt; `{context}` and `{question}` are substituted.
pub const DEFAULT_TEMPLATE: &str = "You are an assistant specialised in waste separation in the city of Paderborn, Germany.
Answer the user's question clearly and helpfully, based on the context information below.
Answer in the language the question is asked in.

Context:
{context}

Question:
{question}

Answer:
";

/// LLM answer with the chunks it was conditioned on.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Generated text.
    pub text: String,
    /// Retrieved chunks, best first.
    pub sources: Vec<String>,
}

/// Retrieval-augmented question answering over a vector index.
pub struct QaChain<E, L> {
    index: VectorIndex,
    embedder: E,
    llm: L,
    template: String,
    k: usize,
}

impl<E: Embedding, L: Llm> QaChain<E, L> {

    /// Create a chain retrieving `k` chunks per question.
    pub fn new(index: VectorIndex, embedder: E, llm: L, template: String, k: usize) -> Result<Self, Error> {
        if k == 0 {
            return Err(Error::ConfigError("number of retrieved chunks must be greater than zero"));
        }
        if !template.contains("{context}") || !template.contains("{question}") {
            return Err(Error::ConfigError("prompt template must contain {context} and {question}"));
        }

        Ok(QaChain {
            index,
            embedder,
            llm,
            template,
            k,
        })
    }

    /// Fill the prompt template.
    pub fn prompt(&self, context: &str, question: &str) -> String {
        self.template
            .replace("{context}", context)
            .replace("{question}", question)
    }

    /// Answer a question.
    pub fn answer(&self, question: &str) -> Result<Answer, Error> {
        let hits = self.index.search(&self.embedder, question, self.k)?;
        debug!("Retrieved {} chunks, scores {:?}", hits.len(), hits.iter().map(|(_, s)| s).collect::<Vec<_>>());

        let sources: Vec<String> = hits.into_iter().map(|(chunk, _)| chunk.text.clone()).collect();
        let prompt = self.prompt(&sources.join("\n\n"), question);

        let text = self.llm.generate(&prompt)?;

        Ok(Answer { text, sources })
    }
}
