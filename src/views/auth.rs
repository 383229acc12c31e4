use std::fmt;
use tracing::{info, warn};

use crate::api_client::ApiClient;
use crate::error::ApiError;

/// Вход и регистрация. Единственное место, которое пишет токен в сессию.
pub struct AuthView {
    client: ApiClient,
    message: Option<String>,
}

impl AuthView {
    pub fn new(client: ApiClient) -> Self {
        Self { client, message: None }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        let result = self.try_login(email, password).await;
        self.message = Some(match &result {
            Ok(()) => "Login successful!".to_string(),
            Err(e) => format!("Login failed: {}", e.user_message()),
        });
        result
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let response = self.client.login(email, password).await?;
        if response.token.trim().is_empty() {
            return Err(ApiError::Validation("server returned an empty token".to_string()));
        }
        self.client.session().set_token(response.token.trim())?;
        info!("logged in as {}", email);
        Ok(())
    }

    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let result = self.client.register(name, email, password).await;
        self.message = Some(match &result {
            Ok(()) => {
                info!("registered {}", email);
                "Registration successful! Redirecting to login...".to_string()
            }
            Err(e) => {
                warn!("registration failed: {}", e);
                format!("Registration failed: {}", e.user_message())
            }
        });
        result
    }

    pub fn logout(&mut self) -> Result<(), ApiError> {
        self.client.session().clear()?;
        self.message = Some("Logged out.".to_string());
        Ok(())
    }
}

impl fmt::Display for AuthView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => writeln!(f, "{}", message),
            None => Ok(()),
        }
    }
}
