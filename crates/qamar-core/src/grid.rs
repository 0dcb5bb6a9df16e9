use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    Empty,
    Day(u32),
}

#[must_use]
pub fn first_weekday(year: i32, month0: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

#[must_use]
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    // Last day of the month is the day before the first of the next one.
    let (next_year, next_month0) = if month0 >= 11 {
        (year + 1, 0)
    } else {
        (year, month0 + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month0 + 1, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

/// Cells for a 7-column month grid: leading blanks up to the weekday of the
/// 1st (Sunday first), then the day numbers. The final row is left partial.
#[must_use]
pub fn build_grid(year: i32, month0: u32) -> Vec<CalendarCell> {
    let leading = first_weekday(year, month0);
    let days = days_in_month(year, month0);
    (0..leading)
        .map(|_| CalendarCell::Empty)
        .chain((1..=days).map(CalendarCell::Day))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{CalendarCell, build_grid, days_in_month, first_weekday};

    #[test]
    fn grid_is_leading_blanks_plus_day_count() {
        for (year, month0) in [(2024, 0), (2024, 1), (2024, 11), (2025, 0), (2025, 6)] {
            let cells = build_grid(year, month0);
            let expected = first_weekday(year, month0) + days_in_month(year, month0);
            assert_eq!(cells.len(), expected as usize);

            let first_day = cells
                .iter()
                .find(|cell| **cell != CalendarCell::Empty)
                .copied();
            assert_eq!(first_day, Some(CalendarCell::Day(1)));
        }
    }

    #[test]
    fn december_2024_starts_on_sunday() {
        let cells = build_grid(2024, 11);
        assert_eq!(first_weekday(2024, 11), 0);
        assert_eq!(cells.len(), 31);
        assert_eq!(cells[0], CalendarCell::Day(1));
    }

    #[test]
    fn january_2025_pads_to_wednesday() {
        let cells = build_grid(2025, 0);
        assert_eq!(&cells[..4], &[
            CalendarCell::Empty,
            CalendarCell::Empty,
            CalendarCell::Empty,
            CalendarCell::Day(1),
        ]);
        assert_eq!(cells.len(), 3 + 31);
        assert_eq!(*cells.last().expect("non-empty grid"), CalendarCell::Day(31));
    }

    #[test]
    fn leap_february_has_twenty_nine_days() {
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2025, 1), 28);

        let cells = build_grid(2024, 1);
        assert_eq!(first_weekday(2024, 1), 4);
        assert_eq!(cells.len(), 4 + 29);
    }

    #[test]
    fn december_day_count_crosses_the_year_boundary() {
        assert_eq!(days_in_month(2024, 11), 31);
    }
}
