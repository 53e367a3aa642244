use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::json;

use crate::ai::{AiError, GenerateRequest, GenerativeClient};
use crate::config::AiConfig;

/// Client for the Generative Language `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiClient {
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = config.api_key.clone().ok_or(AiError::NotConfigured)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AiError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key,
        })
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<Option<String>, AiError> {
        let mut body = json!({
            "contents": [{ "parts": [{ "text": request.prompt }] }]
        });
        if request.json {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }

        debug!("POST {}", self.endpoint);
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AiError::Transport(format!("HTTP {}: {}", status, detail)));
        }

        let parsed = response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let raw = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "First. " }, { "text": "Second." } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("First. Second."));
    }

    #[test]
    fn blank_or_missing_text_is_none() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{ "candidates": [] }"#).unwrap();
        assert_eq!(parsed.text(), None);

        let parsed: GenerateResponse =
            serde_json::from_str(r#"{ "candidates": [ { "content": { "parts": [ { "text": "  " } ] } } ] }"#)
                .unwrap();
        assert_eq!(parsed.text(), None);
    }

    #[test]
    fn requires_an_api_key() {
        let config = AiConfig {
            api_key: None,
            ..AiConfig::default()
        };
        assert!(matches!(
            GeminiClient::from_config(&config),
            Err(AiError::NotConfigured)
        ));
    }

    #[test]
    fn builds_the_model_endpoint() {
        let config = AiConfig {
            api_key: Some("key".to_string()),
            base_url: "https://example.test/v1beta/".to_string(),
            model: "gemini-2.5-flash".to_string(),
            ..AiConfig::default()
        };
        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(
            client.endpoint,
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
