pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use app::{build_router, AppState};
pub use config::AppConfig;
pub use self::core::CampaignOrchestrator;
pub use utils::error::{FunnelError, Result};
