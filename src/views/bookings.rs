//! bookings.rs
//!
//! "Мои бронирования": загрузка броней текущей сессии и их отмена.
//!
//! Статусы брони (Paid / Pending / Failed) выставляет сервер, здесь они
//! только отображаются. Отмена доступна для всего, что не Paid:
//! 1.  спрашиваем подтверждение;
//! 2.  шлём DELETE /booking/{id};
//! 3.  при успехе убираем бронь из локального списка без перезагрузки и
//!     показываем новое число свободных мест события;
//! 4.  при ошибке список не трогаем, бронь можно отменить повторно.
//!
//! Каждая отмена - отдельный запрос, остальные брони она не затрагивает.

use std::fmt;
use tracing::{info, warn};

use super::{remove_by_id, Confirm, ViewState};
use crate::api_client::ApiClient;
use crate::models::{Booking, CancelBookingResponse};

pub const CANCEL_PROMPT: &str = "Are you sure you want to cancel this booking?";
pub const EMPTY_MESSAGE: &str = "You have no bookings yet.";

/// Чем закончилась попытка отмены.
#[derive(Debug, Clone, PartialEq)]
pub enum CancelOutcome {
    /// Пользователь не подтвердил, запрос не отправлялся.
    Declined,
    /// Брони нет в списке или она оплачена - кнопки отмены у неё нет.
    NotCancellable,
    Cancelled(CancelBookingResponse),
    Failed(String),
}

/// Что сейчас показывать. Empty - отдельное конечное состояние, не ошибка.
#[derive(Debug, PartialEq)]
pub enum BookingsDisplay<'a> {
    Loading,
    Error(&'a str),
    Empty,
    List(Vec<BookingRow<'a>>),
}

#[derive(Debug, PartialEq)]
pub struct BookingRow<'a> {
    pub booking: &'a Booking,
    pub can_cancel: bool,
}

pub struct BookingsView {
    client: ApiClient,
    state: ViewState<Vec<Booking>>,
    // итог последней отмены
    notice: Option<String>,
    action_error: Option<String>,
}

impl BookingsView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: ViewState::Loading,
            notice: None,
            action_error: None,
        }
    }

    pub fn state(&self) -> &ViewState<Vec<Booking>> {
        &self.state
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    /// Загружает брони сессии и целиком заменяет список.
    pub async fn load(&mut self) {
        self.state = ViewState::Loading;
        self.notice = None;
        self.action_error = None;

        let result = self.client.my_bookings().await;
        match &result {
            Ok(bookings) => info!("loaded {} booking(s)", bookings.len()),
            Err(e) => warn!("failed to load bookings: {}", e),
        }
        self.state = ViewState::from_result(result);
    }

    pub async fn cancel(&mut self, id: i64, confirm: &dyn Confirm) -> CancelOutcome {
        let offered = self
            .state
            .data()
            .and_then(|list| list.iter().find(|b| b.id == id))
            .map(Booking::is_cancellable)
            .unwrap_or(false);
        if !offered {
            warn!("booking {} is not cancellable from this view", id);
            return CancelOutcome::NotCancellable;
        }

        if !confirm.confirm(CANCEL_PROMPT) {
            return CancelOutcome::Declined;
        }

        self.notice = None;
        self.action_error = None;

        match self.client.cancel_booking(id).await {
            Ok(response) => {
                if let Some(list) = self.state.data_mut() {
                    remove_by_id(list, id);
                }
                info!(
                    "booking {} canceled, event {} has {} seat(s) available",
                    id, response.event_id, response.available_seats
                );
                self.notice = Some(format!(
                    "Booking canceled. Event {} now has {} seats available.",
                    response.event_id, response.available_seats
                ));
                CancelOutcome::Cancelled(response)
            }
            Err(e) => {
                let message = e.user_message();
                warn!("failed to cancel booking {}: {}", id, message);
                self.action_error = Some(message.clone());
                CancelOutcome::Failed(message)
            }
        }
    }

    pub fn display(&self) -> BookingsDisplay<'_> {
        match &self.state {
            ViewState::Loading => BookingsDisplay::Loading,
            ViewState::Error(message) => BookingsDisplay::Error(message),
            ViewState::Success(list) if list.is_empty() => BookingsDisplay::Empty,
            ViewState::Success(list) => BookingsDisplay::List(
                list.iter()
                    .map(|booking| BookingRow {
                        booking,
                        can_cancel: booking.is_cancellable(),
                    })
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for BookingsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(notice) = &self.notice {
            writeln!(f, "{}", notice)?;
        }
        if let Some(error) = &self.action_error {
            writeln!(f, "Error: {}", error)?;
        }

        match self.display() {
            BookingsDisplay::Loading => writeln!(f, "Loading your bookings..."),
            BookingsDisplay::Error(message) => writeln!(f, "Error: {}", message),
            BookingsDisplay::Empty => writeln!(f, "{}", EMPTY_MESSAGE),
            BookingsDisplay::List(rows) => {
                writeln!(f, "My Bookings")?;
                for row in rows {
                    let b = row.booking;
                    writeln!(f)?;
                    writeln!(f, "#{} {}", b.id, b.event.title)?;
                    writeln!(f, "   {}", b.event.location)?;
                    writeln!(f, "   Date: {}", b.event.date.format("%Y-%m-%d"))?;
                    writeln!(f, "   Seats: {}", b.number_of_seats)?;
                    writeln!(f, "   Total Price: {}", b.total_price)?;
                    writeln!(f, "   Status: {}", b.status)?;
                    if row.can_cancel {
                        writeln!(f, "   [cancel]")?;
                    }
                }
                Ok(())
            }
        }
    }
}
