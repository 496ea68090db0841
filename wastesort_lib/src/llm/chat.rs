use serde_json::{json, Value};
use tracing::debug;
use crate::config::LlmConfig;
use crate::error::Error;
use crate::request::Client;
use crate::val_as_str;
use super::util;
use super::Llm;

/// OpenAI-compatible chat completions client (OpenAI, Hugging Face router, vLLM, ...).
///
/// Every call is a single user turn; no history is kept.
pub struct ChatCompletion {
    config: LlmConfig,
    client: Box<dyn Client>,
}

impl ChatCompletion {
    /// Create client.
    pub fn new(config: LlmConfig, client: Box<dyn Client>) -> Self {
        ChatCompletion {
            config,
            client,
        }
    }

    fn prep_payload(&self, prompt: &str) -> Value {
        let mut payload = json!({
            "model": self.config.name,
            "messages": [{
                "role": "user",
                "content": prompt
            }]
        });

        util::set_i64_param(&mut payload, "max_tokens", &self.config.max_tokens);
        util::set_f64_param(&mut payload, "temperature", &self.config.temperature);
        util::set_f64_param(&mut payload, "top_p", &self.config.top_p);

        if let Some(val) = &self.config.stop_sequence {
            payload["stop"] = Value::String(val.clone());
        }

        payload
    }

    fn check_for_error(&self, response: &Value) -> Result<(), Error> {
        if let Some(error) = response.get("error") {
            // some providers send a bare string
            let errmes = match error.as_str() {
                Some(s) => s.to_owned(),
                None => val_as_str!(error["message"], "error message").to_owned(),
            };
            return Err(Error::LLMErrorMessage(errmes));
        }
        Ok(())
    }

    fn process_response(&self, response: Value) -> Result<String, Error> {

        self.check_for_error(&response)?;

        let choice = response["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .ok_or(Error::LLMResponseError("unexpected answer format, no choices in response."))?;

        let msg = &choice["message"];

        if !msg["refusal"].is_null() {
            return Ok(val_as_str!(msg["refusal"], "refusal content").to_owned());
        }

        Ok(val_as_str!(msg["content"], "message content").trim().to_owned())
    }
}

impl Llm for ChatCompletion {

    fn generate(&self, prompt: &str) -> Result<String, Error> {
        let payload = self.prep_payload(prompt);

        let token = format!("Bearer {}", self.config.api_key);
        let headers = &[("Authorization", token.as_ref())];

        debug!("Calling {} at {}", self.config.name, self.config.api_url);

        let response = self.client.post_json(&self.config.api_url, payload, headers)?;

        self.process_response(response)
    }
}
