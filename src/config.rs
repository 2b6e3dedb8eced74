use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置加载错误: 缺少必需的环境变量即启动失败
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub webdriver: WebDriverConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// API 鉴权配置 (x-api-key 请求头)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub api_key: String,
}

/// WebDriver 端点 (chromedriver)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebDriverConfig {
    pub url: String,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

impl AppConfig {
    /// 从环境变量加载配置; DATABASE_URL 和 SECRET_API_KEY 缺失时返回错误
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
            },
            auth: AuthConfig {
                api_key: required("SECRET_API_KEY")?,
            },
            webdriver: WebDriverConfig {
                url: std::env::var("WEBDRIVER_URL")
                    .unwrap_or_else(|_| "http://localhost:9515".to_string()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_url_is_fatal() {
        let err = required("NOTA_FISCAL_TEST_UNSET_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("NOTA_FISCAL_TEST_UNSET_VAR")));
    }
}
