pub mod api_client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod views;

pub use api_client::ApiClient;
pub use error::ApiError;
pub use session::Session;

// Общее состояние для всех view: конфиг, сессия и клиент поверх неё
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub session: Session,
    pub client: ApiClient,
}

impl AppState {
    pub fn new(config: config::Config) -> Result<Self, ApiError> {
        let session = Session::load(&config.session.token_file)?;
        let client = ApiClient::from_config(&config.api, session.clone())?;

        tracing::debug!(
            "api at {}, authenticated: {}",
            client.base_url(),
            session.is_authenticated()
        );

        Ok(Self { config, session, client })
    }
}
