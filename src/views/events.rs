use std::fmt;
use tracing::{info, warn};

use super::ViewState;
use crate::api_client::{ApiClient, BOOKING_FAILED};
use crate::error::ApiError;
use crate::models::Event;

// Список событий, только чтение
pub struct EventCatalogView {
    client: ApiClient,
    state: ViewState<Vec<Event>>,
}

impl EventCatalogView {
    pub fn new(client: ApiClient) -> Self {
        Self { client, state: ViewState::Loading }
    }

    pub fn state(&self) -> &ViewState<Vec<Event>> {
        &self.state
    }

    pub async fn load(&mut self) {
        self.state = ViewState::Loading;
        let result = self.client.list_events().await;
        if let Ok(events) = &result {
            info!("loaded {} event(s)", events.len());
        }
        self.state = ViewState::from_result(result);
    }
}

impl fmt::Display for EventCatalogView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            ViewState::Loading => writeln!(f, "Loading events..."),
            ViewState::Error(message) => writeln!(f, "Error: {}", message),
            ViewState::Success(events) if events.is_empty() => {
                writeln!(f, "No events available at the moment.")
            }
            ViewState::Success(events) => {
                writeln!(f, "Available Events")?;
                for ev in events {
                    writeln!(f)?;
                    writeln!(f, "#{} {}", ev.id, ev.title)?;
                    if let Some(image) = &ev.image_url {
                        writeln!(f, "   image: {}", image)?;
                    }
                    if !ev.description.is_empty() {
                        writeln!(f, "   {}", ev.description)?;
                    }
                    writeln!(f, "   {}", ev.date.format("%Y-%m-%d"))?;
                    if !ev.location.is_empty() {
                        writeln!(f, "   📍 {}", ev.location)?;
                    }
                    if ev.price > 0.0 {
                        writeln!(f, "   💰 {}", ev.price)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Карточка события с формой бронирования.
pub struct EventDetailView {
    client: ApiClient,
    event_id: i64,
    state: ViewState<Event>,
    message: Option<String>,
    action_error: Option<String>,
}

impl EventDetailView {
    pub fn new(client: ApiClient, event_id: i64) -> Self {
        Self {
            client,
            event_id,
            state: ViewState::Loading,
            message: None,
            action_error: None,
        }
    }

    pub fn state(&self) -> &ViewState<Event> {
        &self.state
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    pub async fn load(&mut self) {
        self.state = ViewState::Loading;
        self.state = ViewState::from_result(self.client.get_event(self.event_id).await);
    }

    /// Бронирует `quantity` мест. После успеха событие перечитывается,
    /// чтобы показать актуальные свободные места.
    pub async fn book(&mut self, quantity: i32) -> Result<(), ApiError> {
        self.message = None;
        self.action_error = None;

        let result = self.try_book(quantity).await;
        match &result {
            Ok(()) => {
                self.message = Some("Booking successful!".to_string());
                self.load().await;
            }
            Err(e) => {
                warn!("booking for event {} failed: {}", self.event_id, e);
                self.action_error = Some(e.user_message());
            }
        }
        result
    }

    async fn try_book(&self, quantity: i32) -> Result<(), ApiError> {
        let event = self
            .state
            .data()
            .ok_or_else(|| ApiError::Validation("Event is not loaded".to_string()))?;
        validate_quantity(event, quantity)?;

        self.client
            .create_booking(event.id, quantity)
            .await
            .map_err(|e| match e {
                // пустое тело ответа уже заменено на BOOKING_FAILED
                ApiError::Http { status, message } if message != BOOKING_FAILED => ApiError::Http {
                    status,
                    message: format!("{}: {}", BOOKING_FAILED, message),
                },
                other => other,
            })
    }

    fn write_outcome(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.message {
            writeln!(f, "{}", message)?;
        }
        if let Some(error) = &self.action_error {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

pub fn validate_quantity(event: &Event, quantity: i32) -> Result<(), ApiError> {
    if event.is_sold_out() {
        return Err(ApiError::Validation("Sold Out".to_string()));
    }
    if quantity < 1 {
        return Err(ApiError::Validation("Number of tickets must be at least 1".to_string()));
    }
    if quantity > event.available_seats {
        return Err(ApiError::Validation(format!(
            "Only {} seat(s) available",
            event.available_seats
        )));
    }
    Ok(())
}

impl fmt::Display for EventDetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // бронь могла пройти, даже если перечитать событие не удалось
        let event = match &self.state {
            ViewState::Loading => return writeln!(f, "Loading event..."),
            ViewState::Error(message) => {
                self.write_outcome(f)?;
                return writeln!(f, "Error: {}", message);
            }
            ViewState::Success(event) => event,
        };

        if let Some(image) = &event.image_url {
            writeln!(f, "image: {}", image)?;
        }
        writeln!(f, "{}", event.title)?;
        writeln!(f, "{}", event.description)?;
        writeln!(f, "{}", event.date.format("%Y-%m-%d"))?;
        writeln!(f, "Location: {}", event.location)?;
        writeln!(f, "Price: {}", event.price)?;
        writeln!(f, "Available Seats: {}/{}", event.available_seats, event.total_seats)?;
        if event.is_sold_out() {
            writeln!(f, "Sold Out")?;
        }
        self.write_outcome(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(available: i32) -> Event {
        Event {
            id: 1,
            title: "Gig".to_string(),
            description: String::new(),
            location: "Club".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            total_seats: 10,
            available_seats: available,
            price: 5.0,
            image_url: None,
        }
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(validate_quantity(&event(3), 1).is_ok());
        assert!(validate_quantity(&event(3), 3).is_ok());
        assert!(matches!(validate_quantity(&event(3), 0), Err(ApiError::Validation(_))));
        assert!(matches!(validate_quantity(&event(3), 4), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_sold_out_rejected() {
        match validate_quantity(&event(0), 1) {
            Err(ApiError::Validation(msg)) => assert_eq!(msg, "Sold Out"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
