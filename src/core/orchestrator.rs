use crate::core::parsing::{PlainTextParser, ResponseParser};
use crate::core::prompts;
use crate::domain::model::{
    BusinessDescription, CampaignBatch, CampaignReport, FieldMask, MarketingStrategy,
    PotentialClients, ValidationVerdict,
};
use crate::domain::ports::{MessagingDispatch, PlacesSearch, TextGenerator};
use crate::utils::error::{FunnelError, Result};
use std::sync::Arc;

/// Runs the four request workflows. Every external call is made once, in
/// order; a failure at any step ends the workflow.
pub struct CampaignOrchestrator {
    text: Arc<dyn TextGenerator>,
    places: Arc<dyn PlacesSearch>,
    messaging: Arc<dyn MessagingDispatch>,
    parser: Arc<dyn ResponseParser>,
    field_mask: FieldMask,
}

impl CampaignOrchestrator {
    pub fn new(
        text: Arc<dyn TextGenerator>,
        places: Arc<dyn PlacesSearch>,
        messaging: Arc<dyn MessagingDispatch>,
    ) -> Self {
        Self {
            text,
            places,
            messaging,
            parser: Arc::new(PlainTextParser),
            field_mask: FieldMask::default(),
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn ResponseParser>) -> Self {
        self.parser = parser;
        self
    }

    /// 描述 → AI 關鍵字 → 第一個關鍵字 → 地點搜尋
    pub async fn generate_potential_clients(
        &self,
        description: &BusinessDescription,
    ) -> Result<PotentialClients> {
        tracing::info!("🤖 Generating client keywords");
        let raw = self
            .text
            .generate(&prompts::potential_clients_prompt(description))
            .await?;

        let keywords = self.parser.keywords(&raw);
        let first_keyword = match keywords.first() {
            Some(keyword) => keyword.to_string(),
            None => {
                tracing::warn!("⚠️ Model answered without any usable keyword");
                return Err(FunnelError::NoKeywordsError);
            }
        };
        tracing::debug!("🤖 {} keywords generated: {:?}", keywords.len(), keywords);

        tracing::info!("📍 Searching places for '{}'", first_keyword);
        let places = self
            .places
            .search_text(&first_keyword, &self.field_mask)
            .await?;
        tracing::info!("📍 {} places found", places.len());

        Ok(PotentialClients { keywords, places })
    }

    pub async fn validate_business_description(
        &self,
        description: &BusinessDescription,
    ) -> Result<ValidationVerdict> {
        tracing::info!("🤖 Validating business description");
        let raw = self
            .text
            .generate(&prompts::validation_prompt(description))
            .await?;

        let verdict = self.parser.verdict(&raw);
        match &verdict {
            ValidationVerdict::Accepted => tracing::info!("✅ Description accepted"),
            ValidationVerdict::Suggestion(suggestion) => {
                tracing::info!("💡 Description needs improvement: {}", suggestion)
            }
        }
        Ok(verdict)
    }

    pub async fn generate_marketing_strategy(
        &self,
        description: &BusinessDescription,
    ) -> Result<MarketingStrategy> {
        tracing::info!("🤖 Generating marketing message sequence");
        let raw = self
            .text
            .generate(&prompts::marketing_strategy_prompt(description))
            .await?;

        let response_text = raw.trim().to_string();
        let messages = self.parser.messages(&response_text);
        if messages.is_empty() {
            tracing::warn!("⚠️ No 'Message N:' blocks found in model answer");
        } else {
            tracing::info!("📝 Extracted {} messages", messages.len());
        }

        Ok(MarketingStrategy {
            messages,
            response_text,
        })
    }

    /// 先登入取得 token，再一次送出整批訊息
    pub async fn send_campaign(&self, batch: &CampaignBatch) -> Result<CampaignReport> {
        tracing::info!("🔐 Signing in to messaging provider");
        let token = self.messaging.authenticate().await?;

        tracing::info!("📨 Dispatching {} messages", batch.len());
        self.messaging.send_batch(&token, batch).await?;
        tracing::info!("✅ Campaign batch accepted by provider");

        Ok(CampaignReport::all_sent(batch))
    }
}
