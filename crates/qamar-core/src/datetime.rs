use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::view::MonthView;

const TIMEZONE_CONFIG_FILE: &str = "qamar-time.toml";
const TIMEZONE_ENV_VAR: &str = "QAMAR_TIMEZONE";
const TIMEZONE_CONFIG_ENV_VAR: &str = "QAMAR_TIME_CONFIG";
const DEFAULT_SITE_TIMEZONE: &str = "Europe/London";

/// Gregorian month names, zero-indexed like the viewed month.
pub const GREGORIAN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[must_use]
pub fn month_label(month0: u32) -> &'static str {
    GREGORIAN_MONTHS.get(month0 as usize).copied().unwrap_or("?")
}

#[derive(Debug, Deserialize)]
struct TimezoneConfig {
    timezone: Option<String>,
}

pub fn site_timezone() -> &'static Tz {
    static SITE_TZ: OnceLock<Tz> = OnceLock::new();
    SITE_TZ.get_or_init(resolve_site_timezone)
}

/// Civil date of an instant in the site's timezone. All day-level
/// comparisons in the calendar go through this.
#[must_use]
pub fn to_site_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(site_timezone()).date_naive()
}

#[must_use]
pub fn format_site_datetime(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(site_timezone())
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn resolve_site_timezone() -> Tz {
    if let Ok(raw) = std::env::var(TIMEZONE_ENV_VAR)
        && let Some(tz) = parse_timezone(&raw, TIMEZONE_ENV_VAR)
    {
        return tz;
    }

    if let Some(path) = timezone_config_path()
        && let Some(tz) = load_timezone_from_file(&path)
    {
        return tz;
    }

    parse_timezone(DEFAULT_SITE_TIMEZONE, "DEFAULT_SITE_TIMEZONE").unwrap_or_else(|| {
        error!("failed to parse fallback timezone; using UTC");
        chrono_tz::UTC
    })
}

fn timezone_config_path() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var(TIMEZONE_CONFIG_ENV_VAR) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(TIMEZONE_CONFIG_FILE))
}

fn load_timezone_from_file(path: &PathBuf) -> Option<Tz> {
    if !path.exists() {
        return None;
    }

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            error!(file = %path.display(), error = %err, "failed reading timezone config");
            return None;
        }
    };

    let parsed = match toml::from_str::<TimezoneConfig>(&raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            error!(file = %path.display(), error = %err, "failed parsing timezone config");
            return None;
        }
    };

    let Some(timezone) = parsed.timezone else {
        warn!(file = %path.display(), "timezone config had no timezone field");
        return None;
    };

    parse_timezone(&timezone, &format!("file:{}", path.display()))
}

fn parse_timezone(raw: &str, source: &str) -> Option<Tz> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        warn!(source, "timezone source was empty");
        return None;
    }

    match trimmed.parse::<Tz>() {
        Ok(tz) => {
            info!(source, timezone = %trimmed, "configured site timezone");
            Some(tz)
        }
        Err(err) => {
            error!(source, timezone = %trimmed, error = %err, "failed to parse timezone id");
            None
        }
    }
}

/// Resolve a viewed-month expression against today: `today`, `YYYY-MM`,
/// an English month name (this year), or a `+N`/`-N` whole-month offset.
#[tracing::instrument(skip(today), fields(input = input))]
pub fn parse_month_expr(input: &str, today: NaiveDate) -> anyhow::Result<(i32, u32)> {
    let token = input.trim();
    let lower = token.to_ascii_lowercase();

    if lower == "now" || lower == "today" {
        return Ok((today.year(), today.month0()));
    }

    if let Some(month0) = parse_month_name(&lower) {
        return Ok((today.year(), month0));
    }

    let offset_re = Regex::new(r"^(?P<sign>[+-])(?P<num>\d{1,3})$")
        .map_err(|e| anyhow!("internal regex compile failure: {e}"))?;
    if let Some(caps) = offset_re.captures(token) {
        let num: i32 = caps
            .name("num")
            .map(|m| m.as_str())
            .ok_or_else(|| anyhow!("missing offset amount"))?
            .parse()
            .context("invalid month offset")?;
        let negative = caps.name("sign").map(|m| m.as_str()) == Some("-");

        let mut view = MonthView::containing(today);
        view.shift(if negative { -num } else { num });
        return Ok((view.year(), view.month0()));
    }

    let ym_re = Regex::new(r"^(?P<year>\d{4})-(?P<month>\d{1,2})$")
        .map_err(|e| anyhow!("internal regex compile failure: {e}"))?;
    if let Some(caps) = ym_re.captures(token) {
        let year: i32 = caps
            .name("year")
            .map(|m| m.as_str())
            .ok_or_else(|| anyhow!("missing year"))?
            .parse()
            .context("invalid year value")?;
        let month: u32 = caps
            .name("month")
            .map(|m| m.as_str())
            .ok_or_else(|| anyhow!("missing month"))?
            .parse()
            .context("invalid month value")?;
        if !(1..=12).contains(&month) {
            return Err(anyhow!("month out of range in: {token}"));
        }
        return Ok((year, month - 1));
    }

    Err(anyhow!("unrecognized month expression: {input}")).with_context(|| {
        "supported formats: today, YYYY-MM, month names (e.g. march), +N/-N month offsets"
    })
}

fn parse_month_name(token: &str) -> Option<u32> {
    let token = token.trim();
    if token.len() < 3 {
        return None;
    }

    GREGORIAN_MONTHS
        .iter()
        .position(|name| name.to_ascii_lowercase().starts_with(token))
        .map(|idx| idx as u32)
}
