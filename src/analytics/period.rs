//! Date-range helpers for choosing which records to display.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

use crate::record::Record;

/// The kinds of period a user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodPreset {
    /// The calendar month containing the anchor date.
    #[default]
    Month,
    /// The calendar quarter containing the anchor date.
    Quarter,
    /// The calendar year containing the anchor date.
    Year,
    /// Every record.
    All,
    /// A user chosen start and end date.
    Custom,
}

impl PeriodPreset {
    /// Every preset in the order they are shown to the user.
    pub const ALL: [Self; 5] = [
        Self::Month,
        Self::Quarter,
        Self::Year,
        Self::All,
        Self::Custom,
    ];

    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
            Self::All => "all",
            Self::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Month => "Month",
            Self::Quarter => "Quarter",
            Self::Year => "Year",
            Self::All => "All time",
            Self::Custom => "Custom",
        }
    }

    /// Whether the preset covers a calendar unit that can be stepped through.
    pub fn is_calendar_unit(self) -> bool {
        matches!(self, Self::Month | Self::Quarter | Self::Year)
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    /// Create a range from two dates, swapping them if `start` is after `end`.
    pub fn new(start: Date, end: Date) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Whether `date` lies within the range, inclusive of both ends.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The query parameters that select a period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodQuery {
    /// The period preset to display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<PeriodPreset>,
    /// The anchor date that determines the current month, quarter or year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Date>,
    /// The first day of a custom period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Date>,
    /// The last day of a custom period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Date>,
}

/// A period resolved against the current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePeriod {
    pub preset: PeriodPreset,
    pub anchor: Date,
    /// The dates covered, `None` for all time.
    pub range: Option<DateRange>,
}

impl ActivePeriod {
    /// The query string that selects this period again, e.g.
    /// `"period=month&anchor=2025-10-05"`.
    pub fn to_query(&self) -> String {
        let query = match self.preset {
            PeriodPreset::All => PeriodQuery {
                period: Some(PeriodPreset::All),
                ..Default::default()
            },
            PeriodPreset::Custom => PeriodQuery {
                period: Some(PeriodPreset::Custom),
                start: self.range.map(|range| range.start),
                end: self.range.map(|range| range.end),
                ..Default::default()
            },
            preset => PeriodQuery {
                period: Some(preset),
                anchor: Some(self.anchor),
                ..Default::default()
            },
        };

        serde_urlencoded::to_string(query).unwrap_or_default()
    }

    /// A short description of the period, e.g. "1 Oct 2025 - 31 Oct 2025".
    pub fn label(&self) -> String {
        match self.range {
            Some(range) => range_label(range),
            None => PeriodPreset::All.label().to_owned(),
        }
    }
}

/// Turn the user's period selection into a concrete date range.
///
/// Missing values fall back to the current month. A custom period without an
/// end runs until `today`, one without a start covers everything up to its end.
pub fn resolve_period(query: &PeriodQuery, today: Date) -> ActivePeriod {
    let preset = query.period.unwrap_or_default();
    let anchor = query.anchor.unwrap_or(today);

    let range = match preset {
        PeriodPreset::Month => Some(month_bounds(anchor)),
        PeriodPreset::Quarter => Some(quarter_bounds(anchor)),
        PeriodPreset::Year => Some(year_bounds(anchor)),
        PeriodPreset::All => None,
        PeriodPreset::Custom => match (query.start, query.end) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)),
            (Some(start), None) => Some(DateRange::new(start, today)),
            (None, Some(end)) => Some(DateRange::new(Date::MIN, end)),
            (None, None) => {
                return ActivePeriod {
                    preset: PeriodPreset::Month,
                    anchor,
                    range: Some(month_bounds(anchor)),
                };
            }
        },
    };

    ActivePeriod {
        preset,
        anchor,
        range,
    }
}

/// Links to the periods before and after the active one.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodNavigation {
    pub prev: Option<PeriodNavLink>,
    pub next: Option<PeriodNavLink>,
}

impl PeriodNavigation {
    /// Build the navigation for `active`.
    ///
    /// Only calendar presets can be stepped through. There is no link to a
    /// period that ends before the earliest record in `bounds`, starts after
    /// `today` or lies outside the supported date range.
    pub fn new(active: &ActivePeriod, bounds: Option<DateRange>, today: Date) -> Self {
        let (Some(range), true) = (active.range, active.preset.is_calendar_unit()) else {
            return Self {
                prev: None,
                next: None,
            };
        };

        let prev = range.start.previous_day().and_then(|prev_anchor| {
            let prev_range = compute_range(active.preset, prev_anchor);

            bounds
                .filter(|bounds| prev_range.end >= bounds.start)
                .map(|_| PeriodNavLink::new(active.preset, prev_anchor, prev_range))
        });
        let next = range.end.next_day().and_then(|next_anchor| {
            let next_range = compute_range(active.preset, next_anchor);

            (next_range.start <= today)
                .then(|| PeriodNavLink::new(active.preset, next_anchor, next_range))
        });

        Self { prev, next }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodNavLink {
    pub range: DateRange,
    /// The query string for the linked period.
    pub query: String,
}

impl PeriodNavLink {
    fn new(preset: PeriodPreset, anchor: Date, range: DateRange) -> Self {
        let active = ActivePeriod {
            preset,
            anchor,
            range: Some(range),
        };

        Self {
            range,
            query: active.to_query(),
        }
    }
}

/// The earliest and latest record dates, `None` if there are no records.
pub fn date_bounds<'a>(records: impl IntoIterator<Item = &'a Record>) -> Option<DateRange> {
    records.into_iter().fold(None, |bounds, record| {
        let date = record.local_date();

        Some(match bounds {
            None => DateRange {
                start: date,
                end: date,
            },
            Some(DateRange { start, end }) => DateRange {
                start: start.min(date),
                end: end.max(date),
            },
        })
    })
}

pub fn compute_range(preset: PeriodPreset, anchor: Date) -> DateRange {
    match preset {
        PeriodPreset::Quarter => quarter_bounds(anchor),
        PeriodPreset::Year => year_bounds(anchor),
        _ => month_bounds(anchor),
    }
}

pub fn range_label(range: DateRange) -> String {
    let start = format_date_label(range.start);
    let end = format_date_label(range.end);

    format!("{start} - {end}")
}

/// Monday to Sunday of the week containing `anchor`, clipped to the
/// supported date range for the first and last weeks.
pub(crate) fn week_bounds(anchor: Date) -> DateRange {
    let days_since_monday = anchor.weekday().number_days_from_monday() as i64;
    let start = anchor
        .checked_sub(Duration::days(days_since_monday))
        .unwrap_or(Date::MIN);
    let end = anchor
        .checked_add(Duration::days(6 - days_since_monday))
        .unwrap_or(Date::MAX);

    DateRange { start, end }
}

pub(crate) fn month_bounds(anchor: Date) -> DateRange {
    let start = anchor - Duration::days(anchor.day() as i64 - 1);
    let length = last_day_of_month(anchor.year(), anchor.month()) as i64;
    let end = start + Duration::days(length - 1);

    DateRange { start, end }
}

fn quarter_bounds(anchor: Date) -> DateRange {
    let months_into_quarter = (anchor.month() as u8 - 1) % 3;
    let mut start = month_bounds(anchor).start;

    for _ in 0..months_into_quarter {
        if let Some(previous) = start.previous_day() {
            start = month_bounds(previous).start;
        }
    }

    let mut end = month_bounds(start).end;

    for _ in 0..2 {
        if let Some(next) = end.next_day() {
            end = month_bounds(next).end;
        }
    }

    DateRange { start, end }
}

fn year_bounds(anchor: Date) -> DateRange {
    let start = anchor - Duration::days(anchor.ordinal() as i64 - 1);
    let length = if is_leap_year(anchor.year()) { 366 } else { 365 };
    let end = start + Duration::days(length - 1);

    DateRange { start, end }
}

pub(crate) fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub(crate) fn format_date_label(date: Date) -> String {
    format!(
        "{} {} {}",
        date.day(),
        month_abbrev(date.month()),
        date.year()
    )
}

pub(crate) fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
