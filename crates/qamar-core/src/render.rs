use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use unicode_width::UnicodeWidthStr;

use crate::agenda;
use crate::config::Config;
use crate::datetime::{self, month_label};
use crate::event::CalendarEvent;
use crate::grid::CalendarCell;
use crate::hijri;
use crate::prayer::PrayerTime;
use crate::view::MonthView;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    #[tracing::instrument(skip(self, view, events, today))]
    pub fn print_month(
        &mut self,
        view: &MonthView,
        events: &[CalendarEvent],
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        for line in self.month_lines(view, events, today) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    // Three columns per cell: a two-digit day plus an event marker. Rows of
    // seven, with the last row left partial.
    fn month_lines(
        &self,
        view: &MonthView,
        events: &[CalendarEvent],
        today: NaiveDate,
    ) -> Vec<String> {
        let year = view.year();
        let month0 = view.month0();

        let mut lines = vec![
            format!("{} {}", month_label(month0), year),
            "Su Mo Tu We Th Fr Sa".to_string(),
        ];

        let mut row = String::new();
        for (idx, cell) in view.grid().iter().enumerate() {
            match cell {
                CalendarCell::Empty => row.push_str("   "),
                CalendarCell::Day(day) => {
                    let marked = agenda::has_events(*day, year, month0, events);
                    let is_today =
                        today.year() == year && today.month0() == month0 && today.day() == *day;

                    let mut text = format!("{day:2}");
                    if is_today {
                        text = self.paint(&text, "7");
                    } else if marked {
                        text = self.paint(&text, "36");
                    }
                    row.push_str(&text);
                    row.push(if marked { '*' } else { ' ' });
                }
            }
            if (idx + 1) % 7 == 0 {
                lines.push(row.trim_end().to_string());
                row.clear();
            }
        }
        if !row.trim_end().is_empty() {
            lines.push(row.trim_end().to_string());
        }

        if today.year() == year && today.month0() == month0 {
            lines.push(String::new());
            lines.push(format!(
                "Today: {} | {}",
                today.format("%A %-d %B %Y"),
                hijri::to_hijri(today)
            ));
        }

        lines
    }

    #[tracing::instrument(skip(self, events, now))]
    pub fn print_events(
        &mut self,
        events: &[CalendarEvent],
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = ["When", "Title", "Location"];
        let mut rows = Vec::with_capacity(events.len());
        for event in events {
            let when = datetime::format_site_datetime(event.starts_at);
            let when = if event.starts_at < now {
                self.paint(&when, "31")
            } else {
                when
            };
            rows.push(vec![
                when,
                event.title.clone(),
                event.location.clone().unwrap_or_default(),
            ]);
        }

        write_table(&mut out, &headers, rows)
    }

    #[tracing::instrument(skip(self, events))]
    pub fn print_day_events(&mut self, events: &[&CalendarEvent]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        for event in events {
            let time = event
                .starts_at
                .with_timezone(datetime::site_timezone())
                .format("%H:%M");
            match &event.location {
                Some(location) => writeln!(out, "{time}  {}  ({location})", event.title)?,
                None => writeln!(out, "{time}  {}", event.title)?,
            }
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, timetable))]
    pub fn print_prayers(&mut self, timetable: &[PrayerTime]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let rows = timetable
            .iter()
            .map(|entry| vec![entry.name.to_string(), entry.time.to_string()])
            .collect();
        write_table(&mut out, &["Prayer", "Time"], rows)
    }

    #[tracing::instrument(skip(self, today))]
    pub fn print_today(&mut self, today: NaiveDate) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", today.format("%A %-d %B %Y"))?;
        writeln!(out, "{}", hijri::to_hijri(today))?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: &[&str],
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .map(|row| visible_width(&row[idx]))
                .chain(std::iter::once(UnicodeWidthStr::width(*header)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    for (idx, header) in headers.iter().enumerate() {
        write!(writer, "{:width$} ", header, width = widths[idx])?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{} ", "-".repeat(*width))?;
    }
    writeln!(writer)?;

    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            let padding = widths[idx].saturating_sub(visible_width(cell));
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn visible_width(cell: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(cell).as_str())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            for escaped in chars.by_ref() {
                if escaped == 'm' {
                    break;
                }
            }
            continue;
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::{Renderer, strip_ansi, write_table};
    use crate::event::CalendarEvent;
    use crate::view::MonthView;

    fn plain_renderer() -> Renderer {
        Renderer { color: false }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn december_2024_renders_five_full_rows() {
        let renderer = plain_renderer();
        let view = MonthView::at(2024, 11);
        let lines = renderer.month_lines(&view, &[], date(2024, 10, 20));

        assert_eq!(lines[0], "December 2024");
        assert_eq!(lines[1], "Su Mo Tu We Th Fr Sa");
        // The 1st is a Sunday, so the first data row starts with it.
        assert!(lines[2].starts_with(" 1"));
        assert_eq!(lines.len(), 2 + 5);
    }

    #[test]
    fn event_days_carry_a_marker_and_today_gets_a_footer() {
        let renderer = plain_renderer();
        let view = MonthView::at(2024, 11);
        let events = vec![CalendarEvent::new(
            "Winter Dinner",
            Utc.with_ymd_and_hms(2024, 12, 14, 19, 30, 0)
                .single()
                .expect("valid event time"),
        )];

        let lines = renderer.month_lines(&view, &events, date(2024, 12, 20));
        assert!(lines.iter().any(|line| line.contains("14*")));
        assert!(
            lines
                .last()
                .expect("non-empty output")
                .starts_with("Today: Friday 20 December 2024 | ")
        );
    }

    #[test]
    fn table_columns_align_to_the_widest_cell() {
        let mut out = Vec::new();
        write_table(
            &mut out,
            &["Prayer", "Time"],
            vec![
                vec!["Fajr".to_string(), "05:30".to_string()],
                vec!["Maghrib".to_string(), "19:32".to_string()],
            ],
        )
        .expect("write table");

        let text = String::from_utf8(out).expect("utf8 table");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Prayer  Time  ");
        assert_eq!(lines[1], "------- ----- ");
        assert_eq!(lines[2], "Fajr    05:30 ");
        assert_eq!(lines[3], "Maghrib 19:32 ");
    }

    #[test]
    fn ansi_sequences_do_not_count_toward_width() {
        assert_eq!(strip_ansi("\x1b[31m2024-10-25\x1b[0m"), "2024-10-25");
    }
}
