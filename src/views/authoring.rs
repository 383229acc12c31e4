use std::fmt;
use tracing::warn;

use super::ViewState;
use crate::api_client::ApiClient;
use crate::error::ApiError;
use crate::models::{Event, EventDraft};

// Создание события
pub struct CreateEventView {
    client: ApiClient,
    draft: EventDraft,
    error: Option<String>,
    created: Option<Event>,
}

impl CreateEventView {
    pub fn new(client: ApiClient, draft: EventDraft) -> Self {
        Self {
            client,
            draft,
            error: None,
            created: None,
        }
    }

    pub fn draft_mut(&mut self) -> &mut EventDraft {
        &mut self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn created(&self) -> Option<&Event> {
        self.created.as_ref()
    }

    pub async fn submit(&mut self) -> Result<Event, ApiError> {
        self.error = None;
        match self.client.create_event(&self.draft).await {
            Ok(event) => {
                self.created = Some(event.clone());
                Ok(event)
            }
            Err(e) => {
                warn!("create event failed: {}", e);
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}

impl fmt::Display for CreateEventView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            return writeln!(f, "Error: {}", error);
        }
        match &self.created {
            Some(event) => writeln!(f, "Event #{} \"{}\" created.", event.id, event.title),
            None => writeln!(f, "Create Event: {}", self.draft.title),
        }
    }
}

/// Редактирование: сначала грузим событие в форму, потом PUT.
pub struct EditEventView {
    client: ApiClient,
    event_id: i64,
    state: ViewState<EventDraft>,
    message: Option<String>,
    action_error: Option<String>,
}

impl EditEventView {
    pub fn new(client: ApiClient, event_id: i64) -> Self {
        Self {
            client,
            event_id,
            state: ViewState::Loading,
            message: None,
            action_error: None,
        }
    }

    pub fn state(&self) -> &ViewState<EventDraft> {
        &self.state
    }

    pub fn draft_mut(&mut self) -> Option<&mut EventDraft> {
        self.state.data_mut()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    pub async fn load(&mut self) {
        self.state = ViewState::Loading;
        let result = self.client.get_event(self.event_id).await;
        self.state = ViewState::from_result(result.map(|event| EventDraft::from_event(&event)));
    }

    /// При успехе форма заменяется тем, что вернул сервер (в том числе новой картинкой).
    pub async fn submit(&mut self) -> Result<Event, ApiError> {
        self.message = None;
        self.action_error = None;

        let result = match self.state.data() {
            Some(draft) => self.client.update_event(self.event_id, draft).await,
            None => Err(ApiError::Validation("Event is not loaded".to_string())),
        };

        match result {
            Ok(updated) => {
                self.state = ViewState::Success(EventDraft::from_event(&updated));
                self.message = Some("Event updated successfully!".to_string());
                Ok(updated)
            }
            Err(e) => {
                warn!("update of event {} failed: {}", self.event_id, e);
                self.action_error = Some(e.user_message());
                Err(e)
            }
        }
    }
}

impl fmt::Display for EditEventView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let draft = match &self.state {
            ViewState::Loading => return writeln!(f, "Loading event..."),
            ViewState::Error(message) => return writeln!(f, "Error: {}", message),
            ViewState::Success(draft) => draft,
        };
        if let Some(error) = &self.action_error {
            writeln!(f, "Error: {}", error)?;
        }
        if let Some(message) = &self.message {
            writeln!(f, "{}", message)?;
        }
        writeln!(f, "Edit Event #{}", self.event_id)?;
        for (name, value) in draft.text_fields() {
            writeln!(f, "   {}: {}", name, value)?;
        }
        if let Some(image) = &draft.image {
            writeln!(f, "   new image: {}", image.file_name)?;
        } else if let Some(current) = &draft.current_image_url {
            writeln!(f, "   current image: {}", current)?;
        }
        Ok(())
    }
}
