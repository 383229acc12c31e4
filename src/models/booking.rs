use serde::{Deserialize, Serialize};
use std::fmt;

use super::{EventSummary, Identified};

/// Статус брони. Выставляется сервером при бронировании, клиент его не меняет.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Paid,
    Pending,
    Failed,
}

impl BookingStatus {
    /// Оплаченную бронь отменить нельзя, всё остальное - можно.
    pub fn is_cancellable(self) -> bool {
        self != BookingStatus::Paid
    }

    pub fn label(self) -> &'static str {
        match self {
            BookingStatus::Paid => "Paid ✅",
            BookingStatus::Pending => "Pending ⏳",
            BookingStatus::Failed => "Failed ❌",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub event_id: i64,
    pub event: EventSummary,
    pub number_of_seats: i32,
    pub total_price: f64,
    pub status: BookingStatus,
}

impl Booking {
    pub fn is_cancellable(&self) -> bool {
        self.status.is_cancellable()
    }
}

impl Identified for Booking {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub event_id: i64,
    pub number_of_seats: i32,
}

/// Ответ DELETE /booking/{id}: событие и сколько мест в нём теперь свободно.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingResponse {
    pub event_id: i64,
    pub available_seats: i32,
}
