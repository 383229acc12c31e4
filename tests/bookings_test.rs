mod common;

use common::{booking_json, client, no, server, yes};
use event_booking::models::{BookingStatus, CancelBookingResponse};
use event_booking::views::{BookingsDisplay, BookingsView, CancelOutcome, ViewState};
use event_booking::Session;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_bookings(server: &wiremock::MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/booking/mine"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_only_unpaid_bookings_offer_cancel_and_cancel_removes_it() {
    let server = server().await;
    mount_bookings(&server, json!([booking_json(1, 5, "Paid"), booking_json(2, 5, "Pending")])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/booking/2"))
        .and(header("Authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"eventId": 5, "availableSeats": 12})))
        .expect(1)
        .mount(&server)
        .await;

    let mut view = BookingsView::new(client(&server, Session::with_token("token-1")));
    assert!(view.state().is_loading());
    view.load().await;

    match view.display() {
        BookingsDisplay::List(rows) => {
            let offered: Vec<(i64, bool)> = rows.iter().map(|r| (r.booking.id, r.can_cancel)).collect();
            assert_eq!(offered, vec![(1, false), (2, true)]);
        }
        other => panic!("expected list, got {:?}", other),
    }

    let outcome = view.cancel(2, &yes).await;
    assert_eq!(
        outcome,
        CancelOutcome::Cancelled(CancelBookingResponse { event_id: 5, available_seats: 12 })
    );

    let remaining: Vec<i64> = view.state().data().unwrap().iter().map(|b| b.id).collect();
    assert_eq!(remaining, vec![1]);
    let notice = view.notice().unwrap();
    assert!(notice.contains('5') && notice.contains("12"), "{}", notice);
    assert_eq!(notice, "Booking canceled. Event 5 now has 12 seats available.");

    let rendered = view.to_string();
    assert!(rendered.contains("Paid ✅"));
    assert!(!rendered.contains("[cancel]"));
}

#[tokio::test]
async fn test_paid_booking_is_never_sent_for_cancellation() {
    let server = server().await;
    mount_bookings(&server, json!([booking_json(1, 5, "Paid")])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/booking/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut view = BookingsView::new(client(&server, Session::in_memory()));
    view.load().await;

    assert_eq!(view.cancel(1, &yes).await, CancelOutcome::NotCancellable);
    assert_eq!(view.cancel(99, &yes).await, CancelOutcome::NotCancellable);
    assert_eq!(view.state().data().unwrap().len(), 1);
}

#[tokio::test]
async fn test_declined_confirmation_sends_nothing() {
    let server = server().await;
    mount_bookings(&server, json!([booking_json(3, 5, "Failed")])).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut view = BookingsView::new(client(&server, Session::in_memory()));
    view.load().await;

    assert_eq!(view.cancel(3, &no).await, CancelOutcome::Declined);
    assert_eq!(view.state().data().unwrap().len(), 1);
    assert!(view.notice().is_none());
}

#[tokio::test]
async fn test_failed_cancel_keeps_booking_and_allows_retry() {
    let server = server().await;
    mount_bookings(&server, json!([booking_json(2, 5, "Pending")])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/booking/2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server exploded"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/booking/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"eventId": 5, "availableSeats": 3})))
        .mount(&server)
        .await;

    let mut view = BookingsView::new(client(&server, Session::in_memory()));
    view.load().await;

    assert_eq!(view.cancel(2, &yes).await, CancelOutcome::Failed("Server exploded".to_string()));
    assert_eq!(view.action_error(), Some("Server exploded"));
    assert!(matches!(view.display(), BookingsDisplay::List(ref rows) if rows.len() == 1 && rows[0].can_cancel));

    assert!(matches!(view.cancel(2, &yes).await, CancelOutcome::Cancelled(_)));
    assert!(view.action_error().is_none());
    assert_eq!(view.display(), BookingsDisplay::Empty);
}

#[tokio::test]
async fn test_cancel_leaves_other_bookings_untouched() {
    let server = server().await;
    mount_bookings(
        &server,
        json!([booking_json(1, 5, "Paid"), booking_json(2, 6, "Pending"), booking_json(3, 7, "Failed")]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/booking/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"eventId": 6, "availableSeats": 9})))
        .mount(&server)
        .await;

    let mut view = BookingsView::new(client(&server, Session::in_memory()));
    view.load().await;
    let before = view.state().data().unwrap().clone();

    view.cancel(2, &yes).await;

    let after = view.state().data().unwrap();
    assert_eq!(after.len(), 2);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], before[2]);
    assert_eq!(after[1].status, BookingStatus::Failed);
}

#[tokio::test]
async fn test_empty_list_renders_empty_state() {
    let server = server().await;
    mount_bookings(&server, json!([])).await;

    let mut view = BookingsView::new(client(&server, Session::in_memory()));
    view.load().await;

    assert_eq!(view.state(), &ViewState::Success(vec![]));
    assert_eq!(view.display(), BookingsDisplay::Empty);
    assert_eq!(view.to_string(), "You have no bookings yet.\n");
}

#[tokio::test]
async fn test_failed_load_renders_error_only() {
    let server = server().await;
    Mock::given(method("GET"))
        .and(path("/api/booking/mine"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut view = BookingsView::new(client(&server, Session::in_memory()));
    view.load().await;

    assert_eq!(view.display(), BookingsDisplay::Error("Failed to fetch bookings"));
    assert_eq!(view.to_string(), "Error: Failed to fetch bookings\n");
    assert_eq!(view.cancel(1, &yes).await, CancelOutcome::NotCancellable);
}

#[tokio::test]
async fn test_malformed_bookings_fail_with_decode_error() {
    let server = server().await;
    mount_bookings(&server, json!([{"id": 1, "status": "Paid"}])).await;

    let mut view = BookingsView::new(client(&server, Session::in_memory()));
    view.load().await;

    let message = view.state().error().unwrap();
    assert!(message.starts_with("unexpected response from GET /booking/mine"), "{}", message);
}
