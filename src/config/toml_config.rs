use crate::utils::error::{FunnelError, Result};
use crate::utils::validation::{
    validate_positive_number, validate_socket_addr, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_PLACES_ENDPOINT: &str = "https://places.googleapis.com/v1/places:searchText";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub text_generation: TextGenerationConfig,
    pub places: PlacesConfig,
    pub messaging: MessagingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub request_timeout_seconds: u64,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8787".to_string(),
            request_timeout_seconds: 90,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextGenerationConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for TextGenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: None,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PLACES_ENDPOINT.to_string(),
            api_key: None,
            timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagingConfig {
    pub base_url: Option<String>,
    pub sign_in_path: String,
    pub send_path: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            sign_in_path: "/api/auth/sign-in".to_string(),
            send_path: "/api/whatsapp-web/send-many-message".to_string(),
            username: None,
            password: None,
            timeout_seconds: 15,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn env_value(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FunnelError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let config: Self = toml::from_str(&processed_content).map_err(|e| FunnelError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })?;
        Ok(config.normalized())
    }

    /// 只從環境變數建立配置（未提供設定檔時）
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(bind_addr) = env_value("BIND_ADDR") {
            config.server.bind_addr = bind_addr;
        }
        config.text_generation.api_key = env_value("GOOGLE_AI_API_KEY");
        if let Some(model) = env_value("GEMINI_MODEL") {
            config.text_generation.model = model;
        }
        config.places.api_key = env_value("GOOGLE_PLACES_API_KEY");
        config.messaging.base_url = env_value("WHATSAPP_API_URL");
        config.messaging.username = env_value("WHATSAPP_USERNAME");
        config.messaging.password = env_value("WHATSAPP_PASSWORD");

        config
    }

    /// 替換環境變數 (例如 ${GOOGLE_AI_API_KEY})；未設定的變數替換為空字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FunnelError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                tracing::debug!("Environment variable {} is not set", var_name);
                String::new()
            })
        });

        Ok(result.to_string())
    }

    /// 空字串的密鑰一律視為未設定
    fn normalized(mut self) -> Self {
        self.text_generation.api_key = non_empty(self.text_generation.api_key);
        self.places.api_key = non_empty(self.places.api_key);
        self.messaging.base_url = non_empty(self.messaging.base_url);
        self.messaging.username = non_empty(self.messaging.username);
        self.messaging.password = non_empty(self.messaging.password);
        self
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        validate_socket_addr("server.bind_addr", &self.server.bind_addr)
    }

    /// Settings whose absence makes an endpoint answer with a configuration error.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.text_generation.api_key.is_none() {
            missing.push("text_generation.api_key");
        }
        if self.places.api_key.is_none() {
            missing.push("places.api_key");
        }
        if self.messaging.base_url.is_none() {
            missing.push("messaging.base_url");
        }
        if self.messaging.username.is_none() {
            missing.push("messaging.username");
        }
        if self.messaging.password.is_none() {
            missing.push("messaging.password");
        }
        missing
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        validate_positive_number(
            "server.request_timeout_seconds",
            self.server.request_timeout_seconds,
            1,
        )?;

        validate_url("text_generation.endpoint", &self.text_generation.endpoint)?;
        if self.text_generation.model.trim().is_empty() {
            return Err(FunnelError::InvalidConfigValueError {
                field: "text_generation.model".to_string(),
                value: self.text_generation.model.clone(),
                reason: "Model name cannot be empty".to_string(),
            });
        }
        validate_positive_number(
            "text_generation.timeout_seconds",
            self.text_generation.timeout_seconds,
            1,
        )?;

        validate_url("places.endpoint", &self.places.endpoint)?;
        validate_positive_number("places.timeout_seconds", self.places.timeout_seconds, 1)?;

        if let Some(base_url) = &self.messaging.base_url {
            validate_url("messaging.base_url", base_url)?;
        }
        for (field, path) in [
            ("messaging.sign_in_path", &self.messaging.sign_in_path),
            ("messaging.send_path", &self.messaging.send_path),
        ] {
            if !path.starts_with('/') {
                return Err(FunnelError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: path.clone(),
                    reason: "Path must start with '/'".to_string(),
                });
            }
        }
        validate_positive_number(
            "messaging.timeout_seconds",
            self.messaging.timeout_seconds,
            1,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
bind_addr = "127.0.0.1:9000"
request_timeout_seconds = 45
cors_allowed_origins = ["https://app.example.com"]

[text_generation]
model = "gemini-1.5-pro"
api_key = "gen-key"

[places]
api_key = "places-key"
timeout_seconds = 5

[messaging]
base_url = "https://wa.example.com"
username = "admin"
password = "secret"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.bind_addr().unwrap().port(), 9000);
        assert_eq!(config.server.cors_allowed_origins, vec!["https://app.example.com"]);
        assert_eq!(config.text_generation.model, "gemini-1.5-pro");
        assert_eq!(config.text_generation.endpoint, DEFAULT_GEMINI_ENDPOINT);
        assert_eq!(config.places.timeout_seconds, 5);
        assert_eq!(config.messaging.sign_in_path, "/api/auth/sign-in");
        assert!(config.missing_credentials().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8787");
        assert_eq!(config.places.endpoint, DEFAULT_PLACES_ENDPOINT);
        assert_eq!(config.missing_credentials().len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("REACH_FUNNEL_TEST_PLACES_KEY", "from-env");
        std::env::remove_var("REACH_FUNNEL_TEST_UNSET_KEY");

        let toml_content = r#"
[text_generation]
api_key = "${REACH_FUNNEL_TEST_UNSET_KEY}"

[places]
api_key = "${REACH_FUNNEL_TEST_PLACES_KEY}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.places.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.text_generation.api_key, None);

        std::env::remove_var("REACH_FUNNEL_TEST_PLACES_KEY");
    }

    #[test]
    fn test_config_validation() {
        let invalid_endpoint = r#"
[places]
endpoint = "invalid-url"
"#;
        assert!(AppConfig::from_toml_str(invalid_endpoint)
            .unwrap()
            .validate()
            .is_err());

        let zero_timeout = r#"
[messaging]
timeout_seconds = 0
"#;
        assert!(AppConfig::from_toml_str(zero_timeout)
            .unwrap()
            .validate()
            .is_err());

        let bad_bind = r#"
[server]
bind_addr = "not-an-address"
"#;
        assert!(AppConfig::from_toml_str(bad_bind).unwrap().validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[server\nbind_addr = 1").unwrap_err();
        assert!(matches!(err, FunnelError::ConfigError { .. }));
    }

    #[test]
    fn test_example_config_is_valid() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/configs/reach-funnel.example.toml");
        let config = AppConfig::from_file(path).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.messaging.send_path, "/api/whatsapp-web/send-many-message");
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[text_generation]
api_key = "file-key"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.text_generation.api_key.as_deref(), Some("file-key"));
    }
}
