use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::error::{ConjugatorError, Result};

/// Anything that turns a prompt into raw model text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

// generateContent request/response bodies
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentRequest {
    pub fn new(prompt: &str, temperature: Option<f32>) -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: temperature.map(|temperature| GenerationConfig { temperature }),
        }
    }
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts joined in order.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        Some(text)
    }
}

pub struct ApiClient {
    client: Client,
    api_key: String,
    url: String,
    temperature: Option<f32>,
}

impl ApiClient {
    /// Fails with `NotReady` when no API key is configured.
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.credential()?.to_string();

        let mut builder = ClientBuilder::new();
        if let Some(seconds) = config.api.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|e| ConjugatorError::Configuration(format!("cannot build HTTP client: {}", e)))?;

        let url = format!(
            "{}/models/{}:generateContent",
            config.api.endpoint.trim_end_matches('/'),
            config.api.model
        );

        Ok(ApiClient {
            client,
            api_key,
            url,
            temperature: config.api.temperature,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TextGenerator for ApiClient {
    // Single attempt; the caller reports the failure.
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest::new(prompt, self.temperature);
        log::debug!("POST {} ({} prompt chars)", self.url, prompt.chars().count());

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ConjugatorError::Service(format!(
                "request failed (status {}): {}",
                status, error_text
            )));
        }

        let api_response: GenerateContentResponse = response.json().await?;
        api_response
            .text()
            .ok_or_else(|| ConjugatorError::Service("response has no candidates".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_needs_a_key() {
        let result = ApiClient::new(&Config::default());
        assert!(matches!(result, Err(ConjugatorError::NotReady)));
    }

    #[test]
    fn url_targets_configured_model() {
        let mut config = Config::default().with_api_key(Some("k".to_string()));
        config.api.endpoint = "http://localhost:8080/v1beta/".to_string();
        config.api.model = "test-model".to_string();

        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url(), "http://localhost:8080/v1beta/models/test-model:generateContent");
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::new("hi", Some(0.2))).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["contents"][0]["role"], "user");
        assert!(body["generationConfig"]["temperature"].is_number());

        let body = serde_json::to_value(GenerateContentRequest::new("hi", None)).unwrap();
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn response_text_joins_parts() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"[]\n"},{"text":"==========\n[]"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text().unwrap(), "[]\n==========\n[]");

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.text().is_none());
    }
}
