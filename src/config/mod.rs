use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_SESSION_FILE: &str = ".event-booking-token";

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub session: SessionConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

// Формат логов в stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

// Настройки удалённого API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// None - без таймаута, запрос ждёт ответа сервера сколько угодно.
    pub timeout_seconds: Option<u64>,
}

// Где хранится токен между запусками
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub token_file: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Разбор настроек из произвольного источника key -> value.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Config {
            app: AppConfig {
                environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
                rust_log: get("RUST_LOG").unwrap_or_else(|| "event_booking=info".to_string()),
                log_format: match get("LOG_FORMAT") {
                    Some(raw) if !raw.trim().is_empty() => LogFormat::parse(&raw)
                        .ok_or(ConfigError::Invalid { key: "LOG_FORMAT", value: raw })?,
                    _ => LogFormat::Text,
                },
            },
            api: ApiConfig {
                base_url: normalize_base_url(
                    &get("API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                ),
                timeout_seconds: match get("API_TIMEOUT_SECONDS") {
                    Some(raw) if !raw.trim().is_empty() => Some(
                        raw.trim()
                            .parse()
                            .map_err(|_| ConfigError::Invalid { key: "API_TIMEOUT_SECONDS", value: raw })?,
                    ),
                    _ => None,
                },
            },
            session: SessionConfig {
                token_file: get("SESSION_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE)),
            },
        })
    }

    // Флаги CLI перекрывают переменные окружения
    pub fn with_overrides(mut self, api_url: Option<String>, session_file: Option<PathBuf>) -> Self {
        if let Some(url) = api_url {
            self.api.base_url = normalize_base_url(&url);
        }
        if let Some(path) = session_file {
            self.session.token_file = path;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: AppConfig {
                environment: "development".to_string(),
                rust_log: "event_booking=info".to_string(),
                log_format: LogFormat::Text,
            },
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                timeout_seconds: None,
            },
            session: SessionConfig {
                token_file: PathBuf::from(DEFAULT_SESSION_FILE),
            },
        }
    }
}

pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
