use crate::domain::model::{CampaignBatch, FieldMask, PlaceRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Bearer credential returned by the messaging provider's sign-in call.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// 送出 prompt，回傳模型產生的原始文字
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
pub trait PlacesSearch: Send + Sync {
    async fn search_text(&self, query: &str, field_mask: &FieldMask) -> Result<Vec<PlaceRecord>>;
}

#[async_trait]
pub trait MessagingDispatch: Send + Sync {
    async fn authenticate(&self) -> Result<AccessToken>;
    async fn send_batch(&self, token: &AccessToken, batch: &CampaignBatch) -> Result<()>;
}
