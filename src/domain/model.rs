use crate::utils::error::{FunnelError, Result};
use crate::utils::validation::validate_non_empty_string;
use serde::{Deserialize, Serialize};

/// 行銷訊息序列的最大長度（七個漏斗階段）
pub const MAX_FUNNEL_MESSAGES: usize = 7;

/// Caller-supplied free-text description of a business. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessDescription(String);

impl BusinessDescription {
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        validate_non_empty_string("businessDescription", &raw)?;
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Search phrases in the order the model produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordList(Vec<String>);

impl KeywordList {
    pub fn new(keywords: Vec<String>) -> Self {
        Self(keywords)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// 搜尋服務回傳的地點資料，原樣轉發
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceRecord(pub serde_json::Value);

/// Provider attribute paths requested for every place record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMask(Vec<String>);

impl FieldMask {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    pub fn header_value(&self) -> String {
        self.0.join(",")
    }
}

impl Default for FieldMask {
    fn default() -> Self {
        Self::new([
            "places.displayName",
            "places.formattedAddress",
            "places.priceLevel",
            "places.internationalPhoneNumber",
            "places.userRatingCount",
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageSequence(Vec<String>);

impl MessageSequence {
    /// 超過上限的訊息會被捨棄
    pub fn new(mut messages: Vec<String>) -> Self {
        messages.truncate(MAX_FUNNEL_MESSAGES);
        Self(messages)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignEntry {
    pub phone_number: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CampaignBatch(Vec<CampaignEntry>);

impl CampaignBatch {
    pub fn parse(entries: Vec<CampaignEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(FunnelError::validation(
                "data must contain at least one recipient",
            ));
        }
        for (index, entry) in entries.iter().enumerate() {
            validate_non_empty_string(&format!("data[{}].phoneNumber", index), &entry.phone_number)?;
        }
        Ok(Self(entries))
    }

    pub fn entries(&self) -> &[CampaignEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryState {
    Sent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatus {
    pub phone_number: String,
    pub status: DeliveryState,
}

/// 批次結果：供應商只回報整批成功與否，因此每筆皆標記為 sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignReport {
    pub status: &'static str,
    pub details: Vec<DeliveryStatus>,
}

impl CampaignReport {
    pub fn all_sent(batch: &CampaignBatch) -> Self {
        Self {
            status: "ok",
            details: batch
                .entries()
                .iter()
                .map(|entry| DeliveryStatus {
                    phone_number: entry.phone_number.clone(),
                    status: DeliveryState::Sent,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationVerdict {
    Accepted,
    Suggestion(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PotentialClients {
    pub keywords: KeywordList,
    pub places: Vec<PlaceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingStrategy {
    pub messages: MessageSequence,
    pub response_text: String,
}
