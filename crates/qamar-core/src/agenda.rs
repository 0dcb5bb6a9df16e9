use chrono::Datelike;
use tracing::trace;

use crate::datetime::to_site_date;
use crate::event::CalendarEvent;

/// Events falling on one calendar day of the viewed month. An event matches
/// only when the full (year, month, day) decomposition of its date agrees
/// with the query; the time of day is normalized away in the site timezone
/// first, so a late-evening UTC timestamp lands on the site's civil day.
#[must_use]
pub fn events_on<'a>(
    day: u32,
    year: i32,
    month0: u32,
    events: &'a [CalendarEvent],
) -> Vec<&'a CalendarEvent> {
    events
        .iter()
        .filter(|event| {
            let date = to_site_date(event.starts_at);
            let matched = date.year() == year && date.month0() == month0 && date.day() == day;
            trace!(uuid = %event.uuid, %date, matched, "event day lookup");
            matched
        })
        .collect()
}

#[must_use]
pub fn has_events(day: u32, year: i32, month0: u32, events: &[CalendarEvent]) -> bool {
    !events_on(day, year, month0, events).is_empty()
}

/// Titles for the hover tooltip of one grid cell. Empty when nothing
/// matches; the caller decides whether to show a tooltip at all.
#[must_use]
pub fn preview_titles(day: u32, year: i32, month0: u32, events: &[CalendarEvent]) -> Vec<String> {
    events_on(day, year, month0, events)
        .into_iter()
        .map(|event| event.title.clone())
        .collect()
}
