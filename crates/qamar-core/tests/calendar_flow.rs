use chrono::{TimeZone, Utc};
use qamar_core::agenda;
use qamar_core::event::CalendarEvent;
use qamar_core::grid::CalendarCell;
use qamar_core::hijri;
use qamar_core::store::EventStore;
use qamar_core::view::MonthView;
use tempfile::tempdir;

#[test]
fn store_roundtrip_navigation_and_day_lookup() {
    let temp = tempdir().expect("tempdir");

    let friday_circle = CalendarEvent::new(
        "Friday Circle",
        Utc.with_ymd_and_hms(2024, 10, 25, 12, 0, 0)
            .single()
            .expect("valid event time"),
    );
    let open_day = CalendarEvent::new(
        "Community Open Day",
        Utc.with_ymd_and_hms(2024, 11, 25, 12, 0, 0)
            .single()
            .expect("valid event time"),
    );

    let encoded =
        serde_json::to_string(&vec![open_day.clone(), friday_circle.clone()]).expect("encode");
    std::fs::write(temp.path().join("events.json"), encoded).expect("write fixture");

    let store = EventStore::open(temp.path()).expect("open store");
    let events = store.load_events().expect("load events");
    assert_eq!(events.len(), 2);
    // The store sorts by start time regardless of fixture order.
    assert_eq!(events[0].title, "Friday Circle");

    let mut view = MonthView::at(2024, 9);
    view.select(Some(25));

    let on_25 = agenda::events_on(25, view.year(), view.month0(), &events);
    assert_eq!(on_25.len(), 1);
    assert_eq!(on_25[0].title, "Friday Circle");
    assert!(agenda::events_on(27, view.year(), view.month0(), &events).is_empty());

    view.advance();
    assert_eq!((view.year(), view.month0()), (2024, 10));
    assert_eq!(view.selected(), None);

    // Same day number, next month: only the November event now.
    let titles = agenda::preview_titles(25, view.year(), view.month0(), &events);
    assert_eq!(titles, vec!["Community Open Day"]);
    assert!(agenda::has_events(25, view.year(), view.month0(), &events));

    let grid = view.grid();
    assert_eq!(
        grid.iter()
            .filter(|cell| **cell != CalendarCell::Empty)
            .count(),
        30
    );

    let label = hijri::to_hijri(
        chrono::NaiveDate::from_ymd_opt(2024, 10, 25).expect("valid date"),
    );
    assert_eq!(label.to_string(), "22 Rabi' al-Thani 1446 AH");
}
