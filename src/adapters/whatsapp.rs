use crate::config::MessagingConfig;
use crate::domain::model::CampaignBatch;
use crate::domain::ports::{AccessToken, MessagingDispatch};
use crate::utils::error::{FunnelError, Result, Upstream};
use crate::utils::validation::require_setting;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// WhatsApp gateway client: sign in for a bearer token, then send a whole batch.
pub struct WhatsAppGatewayClient {
    client: Client,
    config: MessagingConfig,
}

#[derive(Serialize)]
struct SignInRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SendManyRequest<'a> {
    data: &'a CampaignBatch,
}

impl WhatsAppGatewayClient {
    pub fn new(config: MessagingConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: MessagingConfig) -> Self {
        Self { client, config }
    }

    fn url(&self, path: &str) -> Result<String> {
        let base_url = require_setting("messaging.base_url", &self.config.base_url)?;
        Ok(format!("{}{}", base_url.trim_end_matches('/'), path))
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    async fn reject(response: reqwest::Response, step: &str) -> FunnelError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!("❌ Messaging {} failed ({}): {}", step, status, body);
        FunnelError::UpstreamStatusError {
            service: Upstream::Messaging,
            status: status.as_u16(),
            body,
        }
    }
}

#[async_trait]
impl MessagingDispatch for WhatsAppGatewayClient {
    async fn authenticate(&self) -> Result<AccessToken> {
        // 所有憑證都必須先確認存在，才發出任何請求
        let url = self.url(&self.config.sign_in_path)?;
        let username = require_setting("messaging.username", &self.config.username)?;
        let password = require_setting("messaging.password", &self.config.password)?;

        tracing::debug!("🔐 POST {}", url);
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout())
            .json(&SignInRequest { username, password })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("❌ Messaging sign-in request failed: {}", e);
                FunnelError::request(Upstream::Messaging, e)
            })?;

        if !response.status().is_success() {
            return Err(Self::reject(response, "sign-in").await);
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FunnelError::request(Upstream::Messaging, e))?;

        match body.pointer("/data/accessToken").and_then(|v| v.as_str()) {
            Some(token) if !token.is_empty() => Ok(AccessToken::new(token)),
            _ => {
                tracing::error!("❌ Messaging sign-in response has no data.accessToken");
                Err(FunnelError::malformed(
                    Upstream::Messaging,
                    "sign-in response has no data.accessToken",
                ))
            }
        }
    }

    async fn send_batch(&self, token: &AccessToken, batch: &CampaignBatch) -> Result<()> {
        let url = self.url(&self.config.send_path)?;

        tracing::debug!("📨 POST {} ({} entries)", url, batch.len());
        let response = self
            .client
            .post(&url)
            .bearer_auth(token.as_str())
            .timeout(self.timeout())
            .json(&SendManyRequest { data: batch })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("❌ Messaging dispatch request failed: {}", e);
                FunnelError::request(Upstream::Messaging, e)
            })?;

        if !response.status().is_success() {
            return Err(Self::reject(response, "dispatch").await);
        }

        Ok(())
    }
}
