#![allow(dead_code)]

use event_booking::{ApiClient, Session};
use serde_json::{json, Value};
use wiremock::MockServer;

pub async fn server() -> MockServer {
    MockServer::start().await
}

pub fn client(server: &MockServer, session: Session) -> ApiClient {
    ApiClient::new(&format!("{}/api", server.uri()), session)
}

pub fn event_json(id: i64, available: i32) -> Value {
    json!({
        "id": id,
        "title": format!("Event {}", id),
        "description": "Live show",
        "location": "Main Hall",
        "date": "2025-09-01T19:00:00",
        "totalSeats": 20,
        "availableSeats": available,
        "price": 15.5
    })
}

pub fn booking_json(id: i64, event_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "eventId": event_id,
        "event": {
            "id": event_id,
            "title": format!("Event {}", event_id),
            "location": "Main Hall",
            "date": "2025-09-01T19:00:00"
        },
        "numberOfSeats": 2,
        "totalPrice": 31.0,
        "status": status
    })
}

pub fn yes(_: &str) -> bool {
    true
}

pub fn no(_: &str) -> bool {
    false
}
