use crate::app::response::ApiJson;
use crate::app::router::AppState;
use crate::domain::model::{
    BusinessDescription, CampaignBatch, CampaignEntry, CampaignReport, MarketingStrategy,
    PotentialClients, ValidationVerdict,
};
use crate::utils::error::{FunnelError, Result};
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDescriptionRequest {
    pub business_description: String,
}

#[derive(Debug, Deserialize)]
pub struct SendCampaignRequest {
    pub data: Vec<CampaignEntry>,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "time": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn not_found() -> FunnelError {
    FunnelError::NoRouteError
}

pub async fn generate_potential_clients(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<BusinessDescriptionRequest>,
) -> Result<Json<PotentialClients>> {
    let description = BusinessDescription::parse(body.business_description)?;
    let clients = state
        .orchestrator
        .generate_potential_clients(&description)
        .await?;
    Ok(Json(clients))
}

pub async fn validate_business_description(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<BusinessDescriptionRequest>,
) -> Result<ValidationVerdict> {
    let description = BusinessDescription::parse(body.business_description)?;
    state
        .orchestrator
        .validate_business_description(&description)
        .await
}

pub async fn generate_marketing_strategy(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<BusinessDescriptionRequest>,
) -> Result<Json<MarketingStrategy>> {
    let description = BusinessDescription::parse(body.business_description)?;
    let strategy = state
        .orchestrator
        .generate_marketing_strategy(&description)
        .await?;
    Ok(Json(strategy))
}

pub async fn send_campaign(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SendCampaignRequest>,
) -> Result<Json<CampaignReport>> {
    let batch = CampaignBatch::parse(body.data)?;
    let report = state.orchestrator.send_campaign(&batch).await?;
    Ok(Json(report))
}
