//! Only for tests.

use serde_json::Value;
use crate::error::Error;
use crate::request::client::Client;

/// Client for tests.
pub struct StubClient {
    expected_headers: Vec<(String, String)>,
    expected_payload: Value,
    response_body: Value,
    page: String,
}

impl StubClient {

    /// Client answering JSON requests.
    pub fn new(expected_headers: Vec<(String, String)>,
        expected_payload: Value, 
        response_body: Value) -> Self 
    {
        StubClient {
            expected_headers,
            expected_payload,
            response_body,
            page: String::new(),
        }
    }

    /// Client serving one page.
    pub fn with_page(page: &str) -> Self {
        StubClient {
            expected_headers: vec![],
            expected_payload: Value::Null,
            response_body: Value::Null,
            page: page.to_owned(),
        }
    }
}

impl Client for StubClient {

    fn post_json(&self, _url: &str, payload: Value, headers: &[(&str, &str)]) -> Result<Value, Error> {
        assert_eq!(headers.len(), self.expected_headers.len(), "headers count");
        for (actual, expected) in headers.iter().zip(self.expected_headers.iter()) {
            assert_eq!(actual.0, expected.0, "headers keys");
            assert_eq!(actual.1, expected.1, "headers values");
        }

        assert_eq!(payload, self.expected_payload);

        Ok(self.response_body.clone())
    }

    fn get_text(&self, _url: &str) -> Result<String, Error> {
        Ok(self.page.clone())
    }
}
