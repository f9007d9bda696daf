use crate::adapters::{GeminiClient, GooglePlacesClient, WhatsAppGatewayClient};
use crate::app::handlers;
use crate::config::{AppConfig, ServerConfig};
use crate::core::CampaignOrchestrator;
use crate::utils::error::{FunnelError, Result};
use axum::error_handling::HandleErrorLayer;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{BoxError, Router};
use std::sync::Arc;
use std::time::Duration;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<CampaignOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: CampaignOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// 以設定建立三個外部服務的 HTTP 客戶端（共用同一個連線池）
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FunnelError::ConfigError {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        let orchestrator = CampaignOrchestrator::new(
            Arc::new(GeminiClient::with_client(
                client.clone(),
                config.text_generation.clone(),
            )),
            Arc::new(GooglePlacesClient::with_client(
                client.clone(),
                config.places.clone(),
            )),
            Arc::new(WhatsAppGatewayClient::with_client(
                client,
                config.messaging.clone(),
            )),
        );

        Ok(Self::new(orchestrator))
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return base.allow_origin(Any);
    }
    if allowed_origins.is_empty() {
        tracing::info!("🔒 CORS allowed origins is empty; cross-origin requests are refused");
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("⚠️ Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}

/// 逾時（或其他中介層錯誤）轉為 JSON 錯誤回應
fn middleware_error(err: BoxError, timeout_seconds: u64) -> FunnelError {
    if err.is::<Elapsed>() {
        FunnelError::RequestTimeoutError {
            seconds: timeout_seconds,
        }
    } else {
        FunnelError::MiddlewareError {
            message: err.to_string(),
        }
    }
}

pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let timeout_seconds = server.request_timeout_seconds;

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/generate-potential-clients",
            post(handlers::generate_potential_clients),
        )
        .route(
            "/api/validate-business-description",
            post(handlers::validate_business_description),
        )
        .route(
            "/api/generate-marketing-strategy",
            post(handlers::generate_marketing_strategy),
        )
        .route("/api/send-campaign", post(handlers::send_campaign))
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    middleware_error(err, timeout_seconds)
                }))
                .layer(TimeoutLayer::new(Duration::from_secs(timeout_seconds))),
        )
        .layer(cors_layer(&server.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
