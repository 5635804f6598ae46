//! HTTP client for the hosted inference API
//!
//! Every model is served at `{base_url}/models/{model}` and accepts a JSON
//! body authenticated with a bearer token.

use reqwest::{Client as ReqwestClient, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

use crate::inference::config::InferenceConfig;
use crate::inference::error::InferenceError;

/// HTTP client for making requests to the inference API
#[derive(Clone)]
pub struct HuggingFaceClient {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Base URL for API requests
    base_url: String,

    /// Bearer credential
    api_token: String,
}

impl std::fmt::Debug for HuggingFaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
impl HuggingFaceClient {
    /// Set the base URL (for testing only)
    pub fn set_base_url(&mut self, url: String) {
        self.base_url = url;
    }
}

impl HuggingFaceClient {
    /// Create a client for the given credential and base URL
    pub fn new(api_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self, InferenceError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(InferenceError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_token: api_token.into(),
        })
    }

    /// Create a client from configuration; fails without a credential
    pub fn from_config(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let token = config
            .api_token
            .clone()
            .ok_or_else(|| InferenceError::NotConfigured(format!("{} is not set", crate::inference::API_KEY_ENV)))?;
        Self::new(token, config.base_url.clone())
    }

    /// Build the URL of a model endpoint
    fn model_url(&self, model: &str) -> Result<Url, InferenceError> {
        let url = format!("{}/models/{}", self.base_url.trim_end_matches('/'), model);
        Url::parse(&url)
            .map_err(|e| InferenceError::UnexpectedResponse(format!("Invalid URL {}: {}", url, e)))
    }

    /// POST a JSON body to a model endpoint
    #[instrument(skip(self, body), level = "debug")]
    pub async fn post<T: DeserializeOwned, B: Serialize + std::fmt::Debug>(
        &self,
        model: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, InferenceError> {
        let url = self.model_url(model)?;

        let request = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .timeout(timeout)
            .json(body);

        debug!("Sending POST request to model {}", model);
        self.execute_request(request, timeout).await
    }

    /// Execute an HTTP request and handle the response
    async fn execute_request<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<T, InferenceError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                InferenceError::Timeout(timeout.as_millis() as u64)
            } else {
                InferenceError::Http(e)
            }
        })?;

        let status = response.status();
        let response_text = response.text().await.map_err(InferenceError::Http)?;

        if status.is_success() {
            serde_json::from_str(&response_text).map_err(|e| {
                error!("Failed to parse response: {}", e);
                InferenceError::UnexpectedResponse(format!("Failed to parse response: {}", e))
            })
        } else {
            error!("API error: {} - {}", status, response_text);

            if status == StatusCode::TOO_MANY_REQUESTS {
                Err(InferenceError::RateLimit {
                    retry_after_secs: 60,
                })
            } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                Err(InferenceError::Auth(
                    "Invalid API key or credentials".to_string(),
                ))
            } else {
                Err(InferenceError::Api {
                    status_code: status.as_u16(),
                    message: response_text,
                })
            }
        }
    }
}
