use std::fmt;
use tracing::{info, warn};

use super::{remove_by_id, Confirm, ViewState};
use crate::api_client::ApiClient;
use crate::models::Event;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this event?";

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardOutcome {
    Declined,
    Deleted,
    Failed(String),
}

/// Кабинет организатора: свои события, удаление.
pub struct OrganizerDashboard {
    client: ApiClient,
    state: ViewState<Vec<Event>>,
    action_error: Option<String>,
}

impl OrganizerDashboard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: ViewState::Loading,
            action_error: None,
        }
    }

    pub fn state(&self) -> &ViewState<Vec<Event>> {
        &self.state
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    pub async fn load(&mut self) {
        self.state = ViewState::Loading;
        self.action_error = None;
        self.state = ViewState::from_result(self.client.my_events().await);
    }

    pub async fn delete_event(&mut self, id: i64, confirm: &dyn Confirm) -> DashboardOutcome {
        if !confirm.confirm(DELETE_PROMPT) {
            return DashboardOutcome::Declined;
        }
        self.action_error = None;

        match self.client.delete_event(id).await {
            Ok(()) => {
                // убираем сразу, без перезагрузки списка
                if let Some(list) = self.state.data_mut() {
                    remove_by_id(list, id);
                }
                info!("event {} removed from dashboard", id);
                DashboardOutcome::Deleted
            }
            Err(e) => {
                let message = e.user_message();
                warn!("failed to delete event {}: {}", id, message);
                self.action_error = Some(message.clone());
                DashboardOutcome::Failed(message)
            }
        }
    }
}

impl fmt::Display for OrganizerDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.action_error {
            writeln!(f, "Error: {}", error)?;
        }
        match &self.state {
            ViewState::Loading => writeln!(f, "Loading dashboard..."),
            ViewState::Error(message) => writeln!(f, "Error: {}", message),
            ViewState::Success(events) if events.is_empty() => {
                writeln!(f, "You have not created any events yet.")
            }
            ViewState::Success(events) => {
                writeln!(f, "My Events")?;
                for ev in events {
                    writeln!(f)?;
                    writeln!(f, "#{} {}", ev.id, ev.title)?;
                    match &ev.image_url {
                        Some(image) => writeln!(f, "   image: {}", self.client.url(image))?,
                        None => writeln!(f, "   No Image")?,
                    }
                    writeln!(f, "   {}", ev.date.format("%Y-%m-%d"))?;
                    writeln!(f, "   {}", ev.location)?;
                    writeln!(f, "   Seats: {}/{}", ev.available_seats, ev.total_seats)?;
                }
                Ok(())
            }
        }
    }
}
