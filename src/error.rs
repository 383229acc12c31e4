use thiserror::Error;

/// Ошибки обращения к API. Каждый view ловит их на своей границе
/// и превращает в текст локального состояния ошибки.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Запрос не удалось отправить или дочитать ответ.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Сервер ответил не-2xx. message - тело ответа или сообщение по умолчанию.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Ответ 2xx, но тело не совпадает с ожидаемой формой.
    #[error("unexpected response from {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Локальная проверка не пройдена, запрос не отправлялся.
    #[error("{0}")]
    Validation(String),

    #[error("failed to persist session: {0}")]
    Session(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Текст для пользователя. Для Http это тело ответа (или дефолт),
    /// для остального - Display.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let reason = errs
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .next()
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{} {}", field, reason)
            })
            .collect();
        // HashMap не сохраняет порядок
        fields.sort();
        ApiError::Validation(fields.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_displays_message_only() {
        let err = ApiError::Http { status: 500, message: "Failed to fetch bookings".to_string() };
        assert_eq!(err.to_string(), "Failed to fetch bookings");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_decode_error_names_context() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = ApiError::Decode { context: "GET /booking/mine".to_string(), source };
        assert!(err.to_string().starts_with("unexpected response from GET /booking/mine"));
        assert_eq!(err.status(), None);
    }
}
