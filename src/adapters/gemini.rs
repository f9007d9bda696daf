use crate::config::TextGenerationConfig;
use crate::domain::ports::TextGenerator;
use crate::utils::error::{FunnelError, Result, Upstream};
use crate::utils::validation::require_setting;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Text generation through the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    client: Client,
    config: TextGenerationConfig,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(config: TextGenerationConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: TextGenerationConfig) -> Self {
        Self { client, config }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = require_setting("text_generation.api_key", &self.config.api_key)?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::debug!("🤖 POST {}", self.generate_url());
        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", api_key)
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("❌ Text generation request failed: {}", e);
                FunnelError::request(Upstream::TextGeneration, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("❌ Text generation API error ({}): {}", status, body);
            return Err(FunnelError::UpstreamStatusError {
                service: Upstream::TextGeneration,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| FunnelError::request(Upstream::TextGeneration, e))?;

        // 有 candidate 但沒有文字時回傳空字串，由流程決定如何處理
        let candidate = parsed.candidates.into_iter().next().ok_or_else(|| {
            tracing::error!("❌ Text generation response contained no candidates");
            FunnelError::malformed(Upstream::TextGeneration, "response contained no candidates")
        })?;

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!("🤖 Model answered with {} characters", text.len());
        Ok(text)
    }
}
