/// Default chat completions endpoint (Hugging Face router, OpenAI-compatible).
pub const DEFAULT_LLM_API_URL: &str = "https://router.huggingface.co/v1/chat/completions";

/// Default LLM.
pub const DEFAULT_LLM_MODEL: &str = "meta-llama/Meta-Llama-3-8B-Instruct";

/// LLM parameters.
#[derive(Clone, Debug)]
pub struct LlmConfig {
    /// Model name.
    pub name: String,
    /// API key.
    pub api_key: String,
    /// Model API URL.
    pub api_url: String,
    /// Maximum number of tokens that will be generated.
    pub max_tokens: Option<i64>,
    /// Level of randomization when choosing tokens.
    pub temperature: Option<f64>,
    /// Only the tokens comprising the top_p probability mass will be considered.
    pub top_p: Option<f64>,
    /// Sequence at which model will stop generating.
    pub stop_sequence: Option<String>,
}


impl LlmConfig {

    /// Create config for the default model with its default sampling parameters.
    pub fn new(api_key: String) -> Self {
        LlmConfig {
            name: DEFAULT_LLM_MODEL.to_owned(),
            api_key,
            api_url: DEFAULT_LLM_API_URL.to_owned(),
            max_tokens: Some(512),
            temperature: Some(0.7),
            top_p: Some(0.95),
            stop_sequence: None,
        }
    }
}
