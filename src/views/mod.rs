//! Headless-представления страниц. Каждое само ходит за данными,
//! держит свою копию и показывает ошибку вместо содержимого.
//! Общего кеша между представлениями нет.

pub mod auth;
pub mod authoring;
pub mod bookings;
pub mod dashboard;
pub mod events;

pub use auth::AuthView;
pub use authoring::{CreateEventView, EditEventView};
pub use bookings::{BookingRow, BookingsDisplay, BookingsView, CancelOutcome};
pub use dashboard::{DashboardOutcome, OrganizerDashboard};
pub use events::{EventCatalogView, EventDetailView};

use crate::error::ApiError;
use crate::models::Identified;

/// Loading -> Success | Error. Перезапуск только явным повторным fetch,
/// и он целиком заменяет состояние.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Loading
    }
}

impl<T> ViewState<T> {
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => ViewState::Success(data),
            Err(e) => ViewState::Error(e.user_message()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            ViewState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Интерактивное подтверждение перед разрушительным действием.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Локальное удаление после успешного DELETE. Отсутствующий id - не ошибка.
/// Возвращает, было ли что удалять.
pub fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: i64) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
