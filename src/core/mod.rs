pub mod orchestrator;
pub mod parsing;
pub mod prompts;

pub use crate::domain::model::{
    BusinessDescription, CampaignBatch, CampaignReport, KeywordList, MarketingStrategy,
    MessageSequence, PotentialClients, ValidationVerdict,
};
pub use crate::domain::ports::{MessagingDispatch, PlacesSearch, TextGenerator};
pub use crate::utils::error::Result;
pub use orchestrator::CampaignOrchestrator;
pub use parsing::{PlainTextParser, ResponseParser};
