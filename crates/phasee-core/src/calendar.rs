use chrono::{Datelike, Months, NaiveDate};

/// A single month as displayed in a Sunday-first grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub first: NaiveDate,
    pub days: Vec<NaiveDate>,
    /// Blank cells before day 1 (0 = Sunday .. 6 = Saturday).
    pub leading_blanks: u32,
}

pub const WEEKDAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

impl MonthView {
    /// Build the view for the month containing `any_day`.
    #[must_use]
    pub fn containing(any_day: NaiveDate) -> Self {
        let first = any_day.with_day(1).unwrap_or(any_day);
        let next = first
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        let days = first.iter_days().take_while(|d| *d < next).collect();
        Self {
            first,
            days,
            leading_blanks: first.weekday().num_days_from_sunday(),
        }
    }

    /// The month before this one.
    #[must_use]
    pub fn previous(&self) -> Self {
        Self::containing(
            self.first
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.first),
        )
    }

    /// The month after this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self::containing(
            self.first
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first),
        )
    }

    /// Month and year, e.g. `June 2024`.
    #[must_use]
    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

/// Format an ISO date as `M-D-YYYY` without zero padding.
#[must_use]
pub fn format_mdy(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.month(), date.day(), date.year())
}

/// English ordinal suffix for a day of the month.
#[must_use]
pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (1, k) if k != 11 => "st",
        (2, k) if k != 12 => "nd",
        (3, k) if k != 13 => "rd",
        _ => "th",
    }
}
