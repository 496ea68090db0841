//! LLM interface.
mod chat;
mod util;

use crate::config::LlmConfig;
use crate::error::Error;
use crate::request::Client;

pub use chat::ChatCompletion;

/// Text generation.
pub trait Llm {
    /// Generate a completion for the prompt.
    fn generate(&self, prompt: &str) -> Result<String, Error>;
}

impl<T: Llm + ?Sized> Llm for Box<T> {
    fn generate(&self, prompt: &str) -> Result<String, Error> {
        (**self).generate(prompt)
    }
}

impl<T: Llm + ?Sized> Llm for &T {
    fn generate(&self, prompt: &str) -> Result<String, Error> {
        (**self).generate(prompt)
    }
}

/// Create LLM client.
pub fn get_llm(config: LlmConfig, client: Box<dyn Client>) -> Box<dyn Llm> {
    Box::new(ChatCompletion::new(config, client))
}
