use crate::domain::model::ValidationVerdict;
use crate::utils::error::{ErrorCategory, FunnelError};
use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for FunnelError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // 原始錯誤只寫入日誌
        match self.category() {
            ErrorCategory::Validation
            | ErrorCategory::EmptyResult
            | ErrorCategory::Routing
            | ErrorCategory::Timeout => {
                tracing::warn!("⚠️ Request rejected: {}", self)
            }
            category => tracing::error!("❌ Request failed ({:?}): {}", category, self),
        }

        (
            status,
            Json(ErrorBody {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}

impl IntoResponse for ValidationVerdict {
    fn into_response(self) -> Response {
        match self {
            ValidationVerdict::Accepted => {
                (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))).into_response()
            }
            ValidationVerdict::Suggestion(suggestion) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "suggestion": suggestion })),
            )
                .into_response(),
        }
    }
}

/// JSON body extractor whose rejections are reported as 400 validation errors.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = FunnelError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(FunnelError::validation(rejection.body_text())),
        }
    }
}
