use crate::config::PlacesConfig;
use crate::domain::model::{FieldMask, PlaceRecord};
use crate::domain::ports::PlacesSearch;
use crate::utils::error::{FunnelError, Result, Upstream};
use crate::utils::validation::require_setting;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Google Places "Text Search (New)" client.
pub struct GooglePlacesClient {
    client: Client,
    config: PlacesConfig,
}

impl GooglePlacesClient {
    pub fn new(config: PlacesConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: PlacesConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl PlacesSearch for GooglePlacesClient {
    async fn search_text(&self, query: &str, field_mask: &FieldMask) -> Result<Vec<PlaceRecord>> {
        let api_key = require_setting("places.api_key", &self.config.api_key)?;

        tracing::debug!("📍 POST {} textQuery='{}'", self.config.endpoint, query);
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("X-Goog-Api-Key", api_key)
            .header("X-Goog-FieldMask", field_mask.header_value())
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .json(&serde_json::json!({ "textQuery": query }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("❌ Places search request failed: {}", e);
                FunnelError::request(Upstream::PlacesSearch, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("❌ Places API error ({}): {}", status, body);
            return Err(FunnelError::UpstreamStatusError {
                service: Upstream::PlacesSearch,
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FunnelError::request(Upstream::PlacesSearch, e))?;

        // 沒有結果時 API 回傳空物件
        match body.get("places") {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(serde_json::Value::Array(items)) => {
                Ok(items.iter().cloned().map(PlaceRecord).collect())
            }
            Some(other) => Err(FunnelError::malformed(
                Upstream::PlacesSearch,
                format!("'places' is not an array: {}", other),
            )),
        }
    }
}
