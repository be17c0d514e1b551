//! End-to-end coverage for the SQLite calendar store.
//!
//! Each test runs against an isolated, migrated database file.

mod support;

use calbridge_core::CalendarStore;
use calbridge_domain::{AccessLevel, BridgeError, EventQuery, EventValues};
use support::TestStore;

fn values(calendar_id: i64, title: &str, start: i64, end: i64) -> EventValues {
    EventValues {
        dtstart: start,
        dtend: end,
        title: title.to_string(),
        description: Some(format!("{title} notes")),
        calendar_id,
        event_timezone: "Europe/Berlin".to_string(),
    }
}

#[tokio::test]
async fn calendars_come_back_in_store_order() {
    let db = TestStore::new();
    let work = db.calendar("Work", AccessLevel::Owner);
    let holidays = db.calendar("Holidays", AccessLevel::Read);

    let rows = db.store.query_calendars().await.unwrap();

    assert_eq!(rows.iter().map(|row| row.id).collect::<Vec<_>>(), vec![work, holidays]);
    assert_eq!(rows[0].display_name.as_deref(), Some("Work"));
    assert_eq!(rows[1].access_level, AccessLevel::Read.value());
    assert_eq!(rows[1].owner_account.as_deref(), Some("tester@example.com"));
}

#[tokio::test]
async fn missing_calendar_is_none() {
    let db = TestStore::new();
    assert!(db.store.query_calendar(99).await.unwrap().is_none());
}

#[tokio::test]
async fn insert_returns_row_uri_and_stores_time_zone() {
    let db = TestStore::new();
    let calendar = db.calendar("Work", AccessLevel::Owner);

    let uri = db.store.insert_event(&values(calendar, "Standup", 1_000, 2_000)).await.unwrap();
    let id: i64 = uri.last_path_segment().unwrap().parse().unwrap();

    assert!(uri.as_str().starts_with("content://com.android.calendar/events/"));
    assert_eq!(db.store.event_timezone(id).unwrap().as_deref(), Some("Europe/Berlin"));
}

#[tokio::test]
async fn insert_into_unknown_calendar_fails() {
    let db = TestStore::new();

    let err = db.store.insert_event(&values(42, "Orphan", 0, 1)).await.unwrap_err();

    assert!(matches!(err, BridgeError::Database(_)));
}

#[tokio::test]
async fn event_query_filters_range_calendar_and_deleted_rows() {
    let db = TestStore::new();
    let work = db.calendar("Work", AccessLevel::Owner);
    let other = db.calendar("Other", AccessLevel::Owner);

    db.store.insert_event(&values(work, "Late", 2_000, 2_500)).await.unwrap();
    db.store.insert_event(&values(work, "Early", 500, 900)).await.unwrap();
    db.store.insert_event(&values(work, "Overruns", 2_900, 3_500)).await.unwrap();
    db.store.insert_event(&values(other, "Elsewhere", 1_000, 1_100)).await.unwrap();
    let gone = db.store.insert_event(&values(work, "Cancelled", 1_000, 1_500)).await.unwrap();
    let gone_id: i64 = gone.last_path_segment().unwrap().parse().unwrap();
    assert_eq!(db.store.delete_event(gone_id).await.unwrap(), 1);

    let rows = db
        .store
        .query_events(EventQuery { calendar_id: work, start_ms: 0, end_ms: 3_000 })
        .await
        .unwrap();

    let titles: Vec<_> = rows.iter().filter_map(|row| row.title.clone()).collect();
    assert_eq!(titles, vec!["Early", "Late"]);
}

#[tokio::test]
async fn update_rewrites_the_row() {
    let db = TestStore::new();
    let calendar = db.calendar("Work", AccessLevel::Owner);
    let uri = db.store.insert_event(&values(calendar, "Draft", 0, 10)).await.unwrap();
    let id: i64 = uri.last_path_segment().unwrap().parse().unwrap();

    let updated = db.store.update_event(id, &values(calendar, "Final", 100, 200)).await.unwrap();
    assert_eq!(updated, 1);

    let rows = db
        .store
        .query_events(EventQuery { calendar_id: calendar, start_ms: 0, end_ms: 1_000 })
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title.as_deref(), Some("Final"));
    assert_eq!(rows[0].dtstart, 100);
    assert_eq!(rows[0].dtend, Some(200));

    assert_eq!(db.store.update_event(9_999, &values(calendar, "Nope", 0, 1)).await.unwrap(), 0);
}

#[tokio::test]
async fn duration_marks_recurring_rows() {
    let db = TestStore::new();
    let calendar = db.calendar("Work", AccessLevel::Owner);
    let recurring =
        db.store.insert_recurring_event(&values(calendar, "Weekly", 0, 0), "P1H").unwrap();
    let single = db.store.insert_event(&values(calendar, "Once", 0, 10)).await.unwrap();
    let single: i64 = single.last_path_segment().unwrap().parse().unwrap();

    assert_eq!(db.store.event_duration(recurring).await.unwrap().as_deref(), Some("P1H"));
    assert_eq!(db.store.event_duration(single).await.unwrap(), None);
    assert_eq!(db.store.event_duration(12_345).await.unwrap(), None);
}

#[tokio::test]
async fn delete_is_soft_and_counts_rows() {
    let db = TestStore::new();
    let calendar = db.calendar("Work", AccessLevel::Owner);
    let uri = db.store.insert_event(&values(calendar, "Standup", 0, 10)).await.unwrap();
    let id: i64 = uri.last_path_segment().unwrap().parse().unwrap();

    assert_eq!(db.store.delete_event(id).await.unwrap(), 1);
    assert_eq!(db.store.delete_event(id).await.unwrap(), 0);

    let conn = db.manager.get_connection().unwrap();
    let deleted: i64 =
        conn.query_row("SELECT deleted FROM events WHERE id = ?1", [id], |row| row.get(0)).unwrap();
    assert_eq!(deleted, 1);
}
