use std::time::Duration;

use reqwest::blocking::Client as BlockingClient;
use serde_json::Value;
use tracing::debug;
use crate::error::Error;
use crate::request::client::Client;

const TIMEOUT: Duration = Duration::from_secs(60);

pub struct ReqwestClient {
    client: BlockingClient,
}

impl ReqwestClient {

    pub fn new() -> Result<Self, Error> {
        let client = BlockingClient::builder()
            .timeout(TIMEOUT)
            .user_agent(concat!("wastesort/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ReqwestClient {
            client,
        })
    }
}

impl Client for ReqwestClient {

    fn post_json(&self, url: &str, payload: Value, headers: &[(&str, &str)]) -> Result<Value, Error> {
        debug!("POST {}", url);

        let mut request = self.client
            .post(url)
            .json(&payload);

        for (k, v) in headers {
            request = request.header(*k, *v);
        }

        let response = request.send()?;

        // providers report errors in the JSON body, so non-2xx bodies are still parsed
        let ret = response.json()?;
        Ok(ret)
    }

    fn get_text(&self, url: &str) -> Result<String, Error> {
        debug!("GET {}", url);

        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus { url: url.to_owned(), status: status.as_u16() });
        }

        Ok(response.text()?)
    }
}
