use std::fmt;
use thiserror::Error;

/// 外部服務識別，用於錯誤訊息與日誌
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    TextGeneration,
    PlacesSearch,
    Messaging,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Upstream::TextGeneration => "text generation API",
            Upstream::PlacesSearch => "places search API",
            Upstream::Messaging => "messaging API",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum FunnelError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Request to {service} failed: {source}")]
    UpstreamRequestError {
        service: Upstream,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned status {status}: {body}")]
    UpstreamStatusError {
        service: Upstream,
        status: u16,
        body: String,
    },

    #[error("{service} returned an unusable response: {message}")]
    UpstreamResponseError { service: Upstream, message: String },

    #[error("AI did not generate any valid keywords")]
    NoKeywordsError,

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("No route matches the request")]
    NoRouteError,

    #[error("Request did not complete within {seconds}s")]
    RequestTimeoutError { seconds: u64 },

    #[error("Unhandled middleware error: {message}")]
    MiddlewareError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Upstream,
    EmptyResult,
    Validation,
    Routing,
    Timeout,
    Internal,
}

impl FunnelError {
    pub fn validation(message: impl Into<String>) -> Self {
        FunnelError::ValidationError {
            message: message.into(),
        }
    }

    pub fn missing_config(field: impl Into<String>) -> Self {
        FunnelError::MissingConfigError {
            field: field.into(),
        }
    }

    pub fn request(service: Upstream, source: reqwest::Error) -> Self {
        FunnelError::UpstreamRequestError { service, source }
    }

    pub fn malformed(service: Upstream, message: impl Into<String>) -> Self {
        FunnelError::UpstreamResponseError {
            service,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FunnelError::ConfigError { .. }
            | FunnelError::MissingConfigError { .. }
            | FunnelError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            FunnelError::UpstreamRequestError { .. }
            | FunnelError::UpstreamStatusError { .. }
            | FunnelError::UpstreamResponseError { .. } => ErrorCategory::Upstream,
            FunnelError::NoKeywordsError => ErrorCategory::EmptyResult,
            FunnelError::ValidationError { .. } => ErrorCategory::Validation,
            FunnelError::NoRouteError => ErrorCategory::Routing,
            FunnelError::RequestTimeoutError { .. } => ErrorCategory::Timeout,
            FunnelError::MiddlewareError { .. } | FunnelError::IoError(_) => ErrorCategory::Internal,
        }
    }

    /// HTTP 狀態碼對應
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation => 400,
            ErrorCategory::EmptyResult | ErrorCategory::Routing => 404,
            ErrorCategory::Timeout => 408,
            ErrorCategory::Configuration | ErrorCategory::Upstream | ErrorCategory::Internal => 500,
        }
    }

    /// 回傳給呼叫端的訊息；上游的原始錯誤只寫入日誌
    pub fn public_message(&self) -> String {
        match self {
            FunnelError::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured.", field)
            }
            FunnelError::ConfigError { .. } | FunnelError::InvalidConfigValueError { .. } => {
                "Service is misconfigured.".to_string()
            }
            FunnelError::UpstreamStatusError {
                service: Upstream::PlacesSearch,
                status,
                ..
            } => format!(
                "Failed to fetch data from places search API. Status: {}",
                status
            ),
            FunnelError::UpstreamRequestError { service, .. }
            | FunnelError::UpstreamStatusError { service, .. }
            | FunnelError::UpstreamResponseError { service, .. } => match service {
                Upstream::TextGeneration => "Failed to generate content from AI model.".to_string(),
                Upstream::PlacesSearch => {
                    "Failed to process request to places search API.".to_string()
                }
                Upstream::Messaging => "Failed to dispatch campaign messages.".to_string(),
            },
            FunnelError::NoKeywordsError => "AI did not generate any valid keywords.".to_string(),
            FunnelError::ValidationError { message } => message.clone(),
            FunnelError::NoRouteError => "Not found.".to_string(),
            FunnelError::RequestTimeoutError { .. } => {
                "Request timed out before processing completed.".to_string()
            }
            FunnelError::MiddlewareError { .. } | FunnelError::IoError(_) => {
                "Internal server error.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, FunnelError>;
