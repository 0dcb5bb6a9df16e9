use anyhow::{Context, anyhow};
use chrono::{Datelike, NaiveDate, Utc};
use tracing::{debug, info, instrument};

use crate::agenda;
use crate::cli::Invocation;
use crate::config::Config;
use crate::datetime::{self, month_label, parse_month_expr};
use crate::event::CalendarEvent;
use crate::prayer::SAMPLE_TIMETABLE;
use crate::render::Renderer;
use crate::store::EventStore;
use crate::view::MonthView;

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "month", "today", "day", "events", "prayers", "_show", "help", "version",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[instrument(skip(store, cfg, renderer, inv))]
pub fn dispatch(
    store: &EventStore,
    cfg: &Config,
    renderer: &mut Renderer,
    inv: Invocation,
) -> anyhow::Result<()> {
    let now = Utc::now();
    let today = datetime::to_site_date(now);
    let command = inv.command.as_str();

    debug!(command, args = ?inv.command_args, "dispatching command");

    match command {
        "month" => cmd_month(store, renderer, &inv.command_args, today),
        "today" => cmd_today(renderer, today),
        "day" => cmd_day(store, renderer, &inv.command_args, today),
        "events" => cmd_events(store, renderer, now),
        "prayers" => cmd_prayers(renderer),
        "_show" => cmd_show(cfg),
        "help" => cmd_help(),
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

#[instrument(skip(store, renderer, args, today))]
fn cmd_month(
    store: &EventStore,
    renderer: &mut Renderer,
    args: &[String],
    today: NaiveDate,
) -> anyhow::Result<()> {
    info!("command month");

    let (year, month0) = match args.first() {
        Some(expr) => parse_month_expr(expr, today)?,
        None => (today.year(), today.month0()),
    };

    let view = MonthView::at(year, month0);
    let events = store.load_events()?;
    renderer.print_month(&view, &events, today)
}

#[instrument(skip(renderer, today))]
fn cmd_today(renderer: &mut Renderer, today: NaiveDate) -> anyhow::Result<()> {
    info!("command today");
    renderer.print_today(today)
}

#[instrument(skip(store, renderer, args, today))]
fn cmd_day(
    store: &EventStore,
    renderer: &mut Renderer,
    args: &[String],
    today: NaiveDate,
) -> anyhow::Result<()> {
    info!("command day");

    let day: u32 = args
        .first()
        .ok_or_else(|| anyhow!("day requires a day number"))?
        .parse()
        .context("invalid day number")?;
    let (year, month0) = match args.get(1) {
        Some(expr) => parse_month_expr(expr, today)?,
        None => (today.year(), today.month0()),
    };

    let events = store.load_events()?;
    let matches = agenda::events_on(day, year, month0, &events);
    if matches.is_empty() {
        println!("No events on {day} {} {year}.", month_label(month0));
        return Ok(());
    }

    renderer.print_day_events(&matches)
}

#[instrument(skip(store, renderer, now))]
fn cmd_events(
    store: &EventStore,
    renderer: &mut Renderer,
    now: chrono::DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command events");

    let events: Vec<CalendarEvent> = store.load_events()?;
    if events.is_empty() {
        println!("No events.");
        return Ok(());
    }

    renderer.print_events(&events, now)?;
    println!("{} event(s).", events.len());
    Ok(())
}

#[instrument(skip(renderer))]
fn cmd_prayers(renderer: &mut Renderer) -> anyhow::Result<()> {
    info!("command prayers");
    renderer.print_prayers(&SAMPLE_TIMETABLE)
}

fn cmd_show(cfg: &Config) -> anyhow::Result<()> {
    for (k, v) in cfg.iter() {
        println!("{k}={v}");
    }
    Ok(())
}

fn cmd_help() -> anyhow::Result<()> {
    println!(
        "Implemented commands: month [EXPR], today, day <N> [EXPR], events, prayers. \
         EXPR is today, YYYY-MM, a month name, or a +N/-N month offset."
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{expand_command_abbrev, known_command_names};

    #[test]
    fn unambiguous_prefixes_expand() {
        let known = known_command_names();
        assert_eq!(expand_command_abbrev("mo", &known), Some("month"));
        assert_eq!(expand_command_abbrev("ev", &known), Some("events"));
        assert_eq!(expand_command_abbrev("version", &known), Some("version"));
    }

    #[test]
    fn shared_prefixes_stay_ambiguous() {
        let known = vec!["month", "members"];
        assert_eq!(expand_command_abbrev("m", &known), None);
    }
}
