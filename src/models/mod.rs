pub mod user;
pub mod event;
pub mod booking;
pub mod draft;
pub mod datetime;

pub use user::{LoginRequest, LoginResponse, RegisterRequest};
pub use event::{Event, EventSummary};
pub use booking::{Booking, BookingStatus, CancelBookingResponse, CreateBookingRequest};
pub use draft::{EventDraft, ImageUpload};

/// Сущности с числовым идентификатором - по нему view удаляет их из локального списка.
pub trait Identified {
    fn id(&self) -> i64;
}
