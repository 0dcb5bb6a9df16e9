use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::grid::{self, CalendarCell};

/// The month a calendar widget is currently showing, plus the day-level
/// selection and hover state that only makes sense against that month.
/// One instance per widget; months are zero-based throughout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    year: i32,
    month0: u32,
    selected: Option<u32>,
    hovered: Option<u32>,
}

impl MonthView {
    #[must_use]
    pub fn at(year: i32, month0: u32) -> Self {
        Self {
            year,
            month0,
            selected: None,
            hovered: None,
        }
    }

    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self::at(date.year(), date.month0())
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn month0(&self) -> u32 {
        self.month0
    }

    #[must_use]
    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    #[must_use]
    pub fn hovered(&self) -> Option<u32> {
        self.hovered
    }

    pub fn advance(&mut self) {
        if self.month0 >= 11 {
            self.month0 = 0;
            self.year += 1;
        } else {
            self.month0 += 1;
        }
        self.clear_day_state();
        debug!(year = self.year, month0 = self.month0, "advanced viewed month");
    }

    pub fn retreat(&mut self) {
        if self.month0 == 0 {
            self.month0 = 11;
            self.year -= 1;
        } else {
            self.month0 -= 1;
        }
        self.clear_day_state();
        debug!(year = self.year, month0 = self.month0, "retreated viewed month");
    }

    pub fn jump_to(&mut self, year: i32, month0: u32) {
        self.year = year;
        self.month0 = month0;
        self.clear_day_state();
        debug!(year, month0, "jumped viewed month");
    }

    pub fn shift(&mut self, months: i32) {
        for _ in 0..months.abs() {
            if months < 0 {
                self.retreat();
            } else {
                self.advance();
            }
        }
    }

    pub fn select(&mut self, day: Option<u32>) {
        self.selected = day;
    }

    pub fn hover(&mut self, day: Option<u32>) {
        self.hovered = day;
    }

    #[must_use]
    pub fn grid(&self) -> Vec<CalendarCell> {
        grid::build_grid(self.year, self.month0)
    }

    // Selected and hovered days refer to the month that was showing; they
    // never survive a transition.
    fn clear_day_state(&mut self) {
        self.selected = None;
        self.hovered = None;
    }
}

#[cfg(test)]
mod tests {
    use super::MonthView;

    #[test]
    fn advance_wraps_december_into_the_next_year() {
        let mut view = MonthView::at(2024, 11);
        view.advance();
        assert_eq!((view.year(), view.month0()), (2025, 0));
    }

    #[test]
    fn retreat_wraps_january_into_the_previous_year() {
        let mut view = MonthView::at(2025, 0);
        view.retreat();
        assert_eq!((view.year(), view.month0()), (2024, 11));
    }

    #[test]
    fn advance_then_retreat_is_a_round_trip() {
        let mut view = MonthView::at(2024, 5);
        view.advance();
        view.retreat();
        assert_eq!((view.year(), view.month0()), (2024, 5));
    }

    #[test]
    fn transitions_drop_selection_and_hover() {
        let mut view = MonthView::at(2024, 9);
        view.select(Some(15));
        view.hover(Some(20));
        view.advance();
        assert_eq!(view.selected(), None);
        assert_eq!(view.hovered(), None);

        view.select(Some(3));
        view.jump_to(2026, 0);
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn shift_moves_by_whole_months_in_either_direction() {
        let mut view = MonthView::at(2024, 10);
        view.shift(3);
        assert_eq!((view.year(), view.month0()), (2025, 1));
        view.shift(-14);
        assert_eq!((view.year(), view.month0()), (2023, 11));
    }

    #[test]
    fn grid_tracks_the_viewed_month() {
        let mut view = MonthView::at(2024, 11);
        assert_eq!(view.grid().len(), 31);
        view.advance();
        // January 2025: three leading blanks plus 31 days.
        assert_eq!(view.grid().len(), 34);
    }
}
