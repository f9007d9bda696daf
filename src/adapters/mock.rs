//! Scripted port implementations for tests and local dry runs.

use crate::domain::model::{CampaignBatch, CampaignEntry, FieldMask, PlaceRecord};
use crate::domain::ports::{AccessToken, MessagingDispatch, PlacesSearch, TextGenerator};
use crate::utils::error::{FunnelError, Result, Upstream};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

fn locked<T: Clone>(value: &Mutex<T>) -> T {
    value.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

/// Returns pre-defined answers in order. Running out of answers is an upstream error.
pub struct ScriptedTextGenerator {
    replies: Vec<String>,
    index: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedTextGenerator {
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self::replying(Vec::<String>::new())
    }

    pub fn prompts(&self) -> Vec<String> {
        locked(&self.prompts)
    }
}

#[async_trait]
impl TextGenerator for ScriptedTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());

        let i = self.index.fetch_add(1, Ordering::SeqCst);
        self.replies.get(i).cloned().ok_or_else(|| {
            FunnelError::malformed(
                Upstream::TextGeneration,
                format!("scripted generator has no reply #{}", i + 1),
            )
        })
    }
}

pub struct StaticPlacesSearch {
    records: Vec<PlaceRecord>,
    fail_with_status: Option<u16>,
    queries: Mutex<Vec<String>>,
}

impl StaticPlacesSearch {
    pub fn with_records(records: Vec<PlaceRecord>) -> Self {
        Self {
            records,
            fail_with_status: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Self::with_records(Vec::new())
        }
    }

    pub fn queries(&self) -> Vec<String> {
        locked(&self.queries)
    }
}

#[async_trait]
impl PlacesSearch for StaticPlacesSearch {
    async fn search_text(&self, query: &str, _field_mask: &FieldMask) -> Result<Vec<PlaceRecord>> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.to_string());

        match self.fail_with_status {
            Some(status) => Err(FunnelError::UpstreamStatusError {
                service: Upstream::PlacesSearch,
                status,
                body: "scripted failure".to_string(),
            }),
            None => Ok(self.records.clone()),
        }
    }
}

/// 記錄每次送出的 token 與批次內容
pub struct RecordingMessenger {
    token: Option<String>,
    fail_dispatch: bool,
    dispatched: Mutex<Vec<(String, Vec<CampaignEntry>)>>,
}

impl RecordingMessenger {
    pub fn accepting(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            fail_dispatch: false,
            dispatched: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting_sign_in() -> Self {
        Self {
            token: None,
            ..Self::accepting("")
        }
    }

    pub fn rejecting_dispatch(token: &str) -> Self {
        Self {
            fail_dispatch: true,
            ..Self::accepting(token)
        }
    }

    pub fn dispatched_tokens(&self) -> Vec<String> {
        locked(&self.dispatched)
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    pub fn dispatched_batches(&self) -> Vec<Vec<CampaignEntry>> {
        locked(&self.dispatched)
            .into_iter()
            .map(|(_, entries)| entries)
            .collect()
    }
}

#[async_trait]
impl MessagingDispatch for RecordingMessenger {
    async fn authenticate(&self) -> Result<AccessToken> {
        match &self.token {
            Some(token) => Ok(AccessToken::new(token.clone())),
            None => Err(FunnelError::UpstreamStatusError {
                service: Upstream::Messaging,
                status: 401,
                body: "scripted sign-in rejection".to_string(),
            }),
        }
    }

    async fn send_batch(&self, token: &AccessToken, batch: &CampaignBatch) -> Result<()> {
        if self.fail_dispatch {
            return Err(FunnelError::UpstreamStatusError {
                service: Upstream::Messaging,
                status: 502,
                body: "scripted dispatch failure".to_string(),
            });
        }
        self.dispatched
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((token.as_str().to_string(), batch.entries().to_vec()));
        Ok(())
    }
}
