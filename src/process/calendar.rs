use chrono::{Datelike, NaiveDate};

/// Month names in calendar order (January → December).
pub const MONTH_NAMES: [&str; 12] = [
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

/// Weekday names in ISO order (Monday → Sunday).
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Calendar fields derived from a sale's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    pub year: i32,
    pub month: u32,
    pub quarter: u32,
    pub month_name: &'static str,
    pub day_of_week: &'static str,
}

impl CalendarFields {
    pub fn from_date(d: NaiveDate) -> Self {
        let month = d.month();
        Self {
            year: d.year(),
            month,
            quarter: (month - 1) / 3 + 1,
            month_name: MONTH_NAMES[d.month0() as usize],
            day_of_week: WEEKDAY_NAMES[d.weekday().num_days_from_monday() as usize],
        }
    }
}

/// Monday of the ISO week containing `d`.
pub fn week_start(d: NaiveDate) -> NaiveDate {
    d - chrono::Duration::days(i64::from(d.weekday().num_days_from_monday()))
}

/// First day of the month containing `d`.
pub fn month_start(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}
