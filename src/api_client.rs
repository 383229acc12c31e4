//! api_client.rs
//!
//! Клиент удалённого API событий и бронирований.
//!
//! Все пути относительные и склеиваются с одним базовым URL из конфигурации.
//! Токен берётся из внедрённой `Session` на каждый запрос; если его нет,
//! запрос уходит без Authorization, а решает сервер.
//! Ретраев, кеша и backoff нет: любая сетевая ошибка или не-2xx ответ
//! сразу возвращается вызывающему view.

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::config::{normalize_base_url, ApiConfig};
use crate::error::ApiError;
use crate::models::{
    Booking, CancelBookingResponse, CreateBookingRequest, Event, EventDraft, LoginRequest,
    LoginResponse, RegisterRequest,
};
use crate::session::Session;

/// Сообщение по умолчанию, когда сервер отклонил бронь без тела ответа.
pub const BOOKING_FAILED: &str = "Failed to book event";

/// Тело запроса.
pub enum RequestBody {
    Json(serde_json::Value),
    /// Content-Type с boundary проставляет транспорт.
    Multipart(Form),
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    session: Session,
}

impl ApiClient {
    /// Клиент без таймаута.
    pub fn new(base_url: &str, session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Arc::from(normalize_base_url(base_url)),
            session,
        }
    }

    pub fn from_config(config: &ApiConfig, session: Session) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            base_url: Arc::from(normalize_base_url(&config.base_url)),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Общая точка отправки. Заголовки вызывающего объединяются с
    /// авторизацией (авторизация перекрывает). Для multipart
    /// Content-Type вызывающего выкидывается.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        headers: Option<HeaderMap>,
        default_message: &str,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);
        let mut merged = headers.unwrap_or_default();
        merged.extend(self.session.auth_headers());

        let mut request = self.http.request(method.clone(), &url);
        match body {
            Some(RequestBody::Json(value)) => {
                request = request.json(&value);
            }
            Some(RequestBody::Multipart(form)) => {
                merged.remove(CONTENT_TYPE);
                request = request.multipart(form);
            }
            None => {}
        }

        debug!("{} {}", method, url);
        let response = request.headers(merged).send().await?;
        check_status(response, default_message).await
    }

    async fn decode<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            context: context.to_string(),
            source,
        })
    }

    // === События ===

    #[tracing::instrument(skip(self))]
    pub async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        let response = self
            .execute(Method::GET, "/events", None, None, "Failed to load events")
            .await?;
        Self::decode(response, "GET /events").await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_event(&self, id: i64) -> Result<Event, ApiError> {
        let response = self
            .execute(Method::GET, &format!("/events/{}", id), None, None, "Failed to fetch event")
            .await?;
        Self::decode(response, "GET /events/{id}").await
    }

    #[tracing::instrument(skip(self))]
    pub async fn my_events(&self) -> Result<Vec<Event>, ApiError> {
        let response = self
            .execute(Method::GET, "/events/my-events", None, None, "Failed to load events")
            .await?;
        Self::decode(response, "GET /events/my-events").await
    }

    #[tracing::instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_event(&self, draft: &EventDraft) -> Result<Event, ApiError> {
        draft.validate()?;
        let form = draft.to_multipart()?;
        let response = self
            .execute(
                Method::POST,
                "/events",
                Some(RequestBody::Multipart(form)),
                None,
                "Failed to create event",
            )
            .await?;
        let event: Event = Self::decode(response, "POST /events").await?;
        info!("event {} created", event.id);
        Ok(event)
    }

    #[tracing::instrument(skip(self, draft))]
    pub async fn update_event(&self, id: i64, draft: &EventDraft) -> Result<Event, ApiError> {
        draft.validate()?;
        let form = draft.to_multipart()?;
        let response = self
            .execute(
                Method::PUT,
                &format!("/events/{}", id),
                Some(RequestBody::Multipart(form)),
                None,
                "Failed to update event",
            )
            .await?;
        Self::decode(response, "PUT /events/{id}").await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_event(&self, id: i64) -> Result<(), ApiError> {
        self.execute(Method::DELETE, &format!("/events/{}", id), None, None, "Failed to delete event")
            .await?;
        info!("event {} deleted", id);
        Ok(())
    }

    // === Бронирования ===

    #[tracing::instrument(skip(self))]
    pub async fn create_booking(&self, event_id: i64, number_of_seats: i32) -> Result<(), ApiError> {
        let body = serde_json::to_value(CreateBookingRequest { event_id, number_of_seats })
            .map_err(|source| ApiError::Decode { context: "POST /booking".to_string(), source })?;
        self.execute(Method::POST, "/booking", Some(RequestBody::Json(body)), None, BOOKING_FAILED)
            .await?;
        info!("booked {} seat(s) for event {}", number_of_seats, event_id);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn my_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let response = self
            .execute(Method::GET, "/booking/mine", None, None, "Failed to fetch bookings")
            .await?;
        Self::decode(response, "GET /booking/mine").await
    }

    #[tracing::instrument(skip(self))]
    pub async fn cancel_booking(&self, id: i64) -> Result<CancelBookingResponse, ApiError> {
        let response = self
            .execute(Method::DELETE, &format!("/booking/{}", id), None, None, "Failed to cancel booking")
            .await?;
        Self::decode(response, "DELETE /booking/{id}").await
    }

    // === Авторизация ===

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .map_err(|source| ApiError::Decode { context: "POST /auth/login".to_string(), source })?;
        let response = self
            .execute(Method::POST, "/auth/login", Some(RequestBody::Json(body)), None, "Login failed")
            .await?;
        Self::decode(response, "POST /auth/login").await
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let body = serde_json::to_value(RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
        .map_err(|source| ApiError::Decode { context: "POST /auth/register".to_string(), source })?;
        self.execute(Method::POST, "/auth/register", Some(RequestBody::Json(body)), None, "Registration failed")
            .await?;
        Ok(())
    }
}

/// Не-2xx превращаем в ApiError::Http: тело ответа или сообщение по умолчанию.
async fn check_status(response: Response, default_message: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    let message = if body.is_empty() {
        default_message.to_string()
    } else {
        body.to_string()
    };
    warn!("request failed with status {}: {}", status, message);

    Err(ApiError::Http {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:5000/api/", Session::in_memory());
        assert_eq!(client.url("/events"), "http://localhost:5000/api/events");
        assert_eq!(client.url("booking/mine"), "http://localhost:5000/api/booking/mine");
    }

    #[test]
    fn test_from_config_normalizes_base_url() {
        let config = ApiConfig {
            base_url: "http://api.test/api//".to_string(),
            timeout_seconds: Some(5),
        };
        let client = ApiClient::from_config(&config, Session::in_memory()).unwrap();
        assert_eq!(client.base_url(), "http://api.test/api");
    }
}
