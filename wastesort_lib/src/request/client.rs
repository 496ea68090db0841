use serde_json::Value;
use crate::error::Error;
use super::reqwest::ReqwestClient;

/// Request client.
pub trait Client {
    /// POST a JSON payload and receive a JSON response.
    fn post_json(&self, url: &str, payload: Value, headers: &[(&str, &str)]) -> Result<Value, Error>;

    /// GET a page as text.
    fn get_text(&self, url: &str) -> Result<String, Error>;
}

/// Create reqwest client.
pub fn get_reqwest_client() -> Result<Box<dyn Client>, Error> {
    Ok(Box::new(ReqwestClient::new()?))
}
