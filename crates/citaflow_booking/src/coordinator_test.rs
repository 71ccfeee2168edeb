// --- File: crates/citaflow_booking/src/coordinator_test.rs ---

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::error::BookingError;
use crate::test_support::{blocking_event, coordinator, request, services, FakeCalendar, FakeLedger, FakeMailer};

#[tokio::test]
async fn happy_path_reserves_records_and_notifies_once() {
    let calendar = Arc::new(FakeCalendar::empty());
    let ledger = Arc::new(FakeLedger::working());
    let mailer = Arc::new(FakeMailer::working());
    let coordinator = coordinator(services(calendar.clone(), ledger.clone(), mailer.clone()));

    let outcome = coordinator.process(request()).await.unwrap();

    assert_eq!(outcome.message, "Cita creada exitosamente");
    assert_eq!(outcome.event_id.as_deref(), Some("evt-1"));
    assert!(outcome.html_link.is_some());
    assert_eq!(calendar.insert_count(), 1);
    assert_eq!(ledger.row_count(), 1);
    assert_eq!(mailer.sent_count(), 1);
}

#[tokio::test]
async fn event_draft_carries_title_attendees_and_reminders() {
    let calendar = Arc::new(FakeCalendar::empty());
    let ledger = Arc::new(FakeLedger::working());
    let mailer = Arc::new(FakeMailer::working());
    let coordinator = coordinator(services(calendar.clone(), ledger.clone(), mailer));

    coordinator.process(request()).await.unwrap();

    let inserted = calendar.inserted.lock().unwrap();
    let draft = &inserted[0];
    assert_eq!(draft.summary, "Cita: Ana García (Consulta Nutricional)");
    assert!(draft.description.contains("Email Cliente: ana@example.com"));
    assert!(draft.description.contains("Teléfono: 600000000"));
    assert_eq!(
        draft.attendees,
        vec!["ana@example.com".to_string(), "owner@example.com".to_string()]
    );
    assert_eq!(draft.time_zone, "Europe/Madrid");
    assert_eq!(draft.reminder_overrides.len(), 2);
    assert_eq!(draft.reminder_overrides[0].method, "email");
    assert_eq!(draft.reminder_overrides[0].minutes, 24 * 60);
    assert_eq!(draft.reminder_overrides[1].method, "popup");
    assert_eq!(draft.reminder_overrides[1].minutes, 10);
    assert_eq!((draft.end - draft.start).num_minutes(), 60);
}

#[tokio::test]
async fn ledger_row_reflects_the_booking() {
    let calendar = Arc::new(FakeCalendar::empty());
    let ledger = Arc::new(FakeLedger::working());
    let mailer = Arc::new(FakeMailer::working());
    let coordinator = coordinator(services(calendar, ledger.clone(), mailer));

    coordinator.process(request()).await.unwrap();

    let rows = ledger.rows.lock().unwrap();
    let row = &rows[0];
    assert_eq!(row.nombre, "Ana");
    assert_eq!(row.service_type, "consulta");
    assert_eq!(row.start_local, "15/3/2024, 09:00");
    assert_eq!(row.event_link, "https://calendar.google.com/event?eid=evt-1");
}

#[tokio::test]
async fn conflicting_slot_writes_nothing() {
    let calendar = Arc::new(FakeCalendar::with_events(vec![blocking_event()]));
    let ledger = Arc::new(FakeLedger::working());
    let mailer = Arc::new(FakeMailer::working());
    let coordinator = coordinator(services(calendar.clone(), ledger.clone(), mailer.clone()));

    let err = coordinator.process(request()).await.unwrap_err();

    assert!(matches!(err, BookingError::Conflict));
    assert_eq!(calendar.insert_count(), 0);
    assert_eq!(ledger.row_count(), 0);
    assert_eq!(mailer.sent_count(), 0);
}

#[tokio::test]
async fn empty_field_fails_before_any_external_call() {
    let calendar = Arc::new(FakeCalendar::empty());
    let ledger = Arc::new(FakeLedger::working());
    let mailer = Arc::new(FakeMailer::working());
    let coordinator = coordinator(services(calendar.clone(), ledger.clone(), mailer.clone()));

    let mut bad = request();
    bad.email = "   ".to_string();
    let err = coordinator.process(bad).await.unwrap_err();

    assert!(matches!(err, BookingError::MalformedInput(_)));
    assert_eq!(calendar.list_calls.load(Ordering::SeqCst), 0);
    assert_eq!(calendar.insert_count(), 0);
    assert_eq!(ledger.row_count(), 0);
    assert_eq!(mailer.sent_count(), 0);
}

#[tokio::test]
async fn unknown_service_fails_before_any_external_call() {
    let calendar = Arc::new(FakeCalendar::empty());
    let ledger = Arc::new(FakeLedger::working());
    let mailer = Arc::new(FakeMailer::working());
    let coordinator = coordinator(services(calendar.clone(), ledger.clone(), mailer));

    let mut bad = request();
    bad.service_type = "masaje".to_string();
    let err = coordinator.process(bad).await.unwrap_err();

    assert!(matches!(err, BookingError::UnknownService(_)));
    assert_eq!(calendar.list_calls.load(Ordering::SeqCst), 0);
    assert_eq!(ledger.row_count(), 0);
}

#[tokio::test]
async fn failed_insert_is_reservation_failed_with_no_ledger_write() {
    let mut cal = FakeCalendar::empty();
    cal.fail_insert = true;
    let calendar = Arc::new(cal);
    let ledger = Arc::new(FakeLedger::working());
    let mailer = Arc::new(FakeMailer::working());
    let coordinator = coordinator(services(calendar, ledger.clone(), mailer.clone()));

    let err = coordinator.process(request()).await.unwrap_err();

    assert!(matches!(err, BookingError::ReservationFailed(_)));
    assert_eq!(ledger.row_count(), 0);
    assert_eq!(mailer.sent_count(), 0);
}

#[tokio::test]
async fn ledger_failure_is_partial_and_keeps_the_event() {
    let calendar = Arc::new(FakeCalendar::empty());
    let ledger = Arc::new(FakeLedger::failing());
    let mailer = Arc::new(FakeMailer::working());
    let coordinator = coordinator(services(calendar.clone(), ledger, mailer.clone()));

    let err = coordinator.process(request()).await.unwrap_err();

    match err {
        BookingError::PartialFailure {
            event_id,
            html_link,
            ..
        } => {
            assert_eq!(event_id.as_deref(), Some("evt-1"));
            assert!(html_link.is_some());
        }
        other => panic!("expected PartialFailure, got {other:?}"),
    }
    // The event was inserted and is not deleted afterwards.
    assert_eq!(calendar.insert_count(), 1);
    // No confirmation mail for a partial booking.
    assert_eq!(mailer.sent_count(), 0);
}

#[tokio::test]
async fn mail_failure_does_not_fail_the_booking() {
    let calendar = Arc::new(FakeCalendar::empty());
    let ledger = Arc::new(FakeLedger::working());
    let mailer = Arc::new(FakeMailer::failing());
    let coordinator = coordinator(services(calendar, ledger.clone(), mailer));

    let outcome = coordinator.process(request()).await.unwrap();

    assert_eq!(outcome.message, "Cita creada exitosamente");
    assert_eq!(ledger.row_count(), 1);
}

#[tokio::test]
async fn failing_availability_check_aborts_with_upstream_unavailable() {
    let mut cal = FakeCalendar::empty();
    cal.fail_list = true;
    let calendar = Arc::new(cal);
    let ledger = Arc::new(FakeLedger::working());
    let mailer = Arc::new(FakeMailer::working());
    let coordinator = coordinator(services(calendar.clone(), ledger.clone(), mailer));

    let err = coordinator.process(request()).await.unwrap_err();

    assert!(matches!(err, BookingError::UpstreamUnavailable(_)));
    assert_eq!(calendar.insert_count(), 0);
    assert_eq!(ledger.row_count(), 0);
}

#[tokio::test]
async fn concurrent_requests_for_the_same_slot_can_both_succeed() {
    // Documents the accepted check-then-act race: the fake calendar never
    // reflects its own inserts, like the real one during the race window.
    let calendar = Arc::new(FakeCalendar::empty());
    let ledger = Arc::new(FakeLedger::working());
    let mailer = Arc::new(FakeMailer::working());
    let coordinator = coordinator(services(calendar.clone(), ledger.clone(), mailer));

    let (a, b) = tokio::join!(coordinator.process(request()), coordinator.process(request()));

    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(calendar.insert_count(), 2);
    assert_eq!(ledger.row_count(), 2);
}

#[tokio::test]
async fn check_availability_resolves_service_duration() {
    let calendar = Arc::new(FakeCalendar::empty());
    let ledger = Arc::new(FakeLedger::working());
    let mailer = Arc::new(FakeMailer::working());
    let coordinator = coordinator(services(calendar.clone(), ledger, mailer));

    let available = coordinator
        .check_availability("2024-03-15 09:00", "seguimiento")
        .await
        .unwrap();

    assert!(available);
    assert_eq!(calendar.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(calendar.insert_count(), 0);
}
