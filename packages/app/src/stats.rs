//! # Study statistics
//!
//! Pure functions over `(month, sessions, work types)` feeding the bar chart,
//! the pie chart, the heatmap and the summary figures. Sessions are bucketed by
//! their calendar day in the caller's time zone. A session is attributed to a
//! label through its work type id; sessions whose work type was deleted count
//! toward no label and are left out of the monthly figures.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use store::{StudySession, WorkType};

const MS_PER_DAY: i64 = 86_400_000;
/// Hours of study that saturate a heatmap cell.
const FULL_DAY_HOURS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// `None` unless `month` is 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day();
        first
            .iter_days()
            .take_while(move |day| day.month() == first.month())
    }

    pub fn next(self) -> Self {
        Self::of(self.first_day() + Months::new(1))
    }

    pub fn previous(self) -> Self {
        Self::of(self.first_day() - Months::new(1))
    }
}

/// One bar of the monthly chart: `{"date": "07", "total": 1.5, "<label>": hours, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRow {
    #[serde(skip)]
    pub day: NaiveDate,
    /// Two-digit day of month.
    pub date: String,
    pub total: f64,
    #[serde(flatten)]
    pub hours: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub name: String,
    pub value: f64,
}

fn hours(minutes: i32) -> f64 {
    f64::from(minutes) / 60.0
}

fn local_day<Tz: TimeZone>(date: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    date.with_timezone(tz).date_naive()
}

fn month_sessions<'a, Tz: TimeZone + 'a>(
    month: YearMonth,
    sessions: &'a [StudySession],
    tz: &'a Tz,
) -> impl Iterator<Item = (NaiveDate, &'a StudySession)> + 'a {
    sessions
        .iter()
        .map(move |s| (local_day(&s.date, tz), s))
        .filter(move |(day, _)| YearMonth::of(*day) == month)
}

/// A row for every day of `month`, each with an entry for every work type.
pub fn month_rows<Tz: TimeZone>(
    month: YearMonth,
    sessions: &[StudySession],
    work_types: &[WorkType],
    tz: &Tz,
) -> Vec<DayRow> {
    let mut rows: Vec<DayRow> = month
        .days()
        .map(|day| DayRow {
            day,
            date: day.format("%d").to_string(),
            total: 0.0,
            hours: work_types
                .iter()
                .map(|wt| (wt.label.clone(), 0.0))
                .collect(),
        })
        .collect();

    for (day, session) in month_sessions(month, sessions, tz) {
        let Some(work_type) = work_types.iter().find(|wt| wt.id == session.work_type_id) else {
            continue;
        };
        let row = &mut rows[day.day0() as usize];
        *row.hours.entry(work_type.label.clone()).or_default() += hours(session.duration);
    }
    for row in &mut rows {
        row.total = row.hours.values().sum();
    }
    rows
}

/// Hours per work type within `month`, in work-type order, zeros dropped.
pub fn category_breakdown<Tz: TimeZone>(
    month: YearMonth,
    sessions: &[StudySession],
    work_types: &[WorkType],
    tz: &Tz,
) -> Vec<Category> {
    work_types
        .iter()
        .map(|wt| Category {
            name: wt.label.clone(),
            value: month_sessions(month, sessions, tz)
                .filter(|(_, s)| s.work_type_id == wt.id)
                .map(|(_, s)| hours(s.duration))
                .sum(),
        })
        .filter(|c| c.value > 0.0)
        .collect()
}

pub fn total_hours(breakdown: &[Category]) -> f64 {
    breakdown.iter().map(|c| c.value).sum()
}

/// All recorded hours over the inclusive day span from the first to the last
/// session. Not limited to any month.
pub fn average_hours_per_day(sessions: &[StudySession]) -> f64 {
    let (Some(first), Some(last)) = (
        sessions.iter().map(|s| s.date).min(),
        sessions.iter().map(|s| s.date).max(),
    ) else {
        return 0.0;
    };
    let span_days = (last - first).num_milliseconds() / MS_PER_DAY + 1;
    let total: f64 = sessions.iter().map(|s| hours(s.duration)).sum();
    total / span_days as f64
}

/// Heatmap cell shade in `0.0..=1.0`.
pub fn heat_intensity(total_hours: f64) -> f64 {
    (total_hours / FULL_DAY_HOURS).clamp(0.0, 1.0)
}

/// Empty cells before the 1st in a Sunday-first calendar grid.
pub fn leading_blank_days(month: YearMonth) -> u32 {
    month.first_day().weekday().num_days_from_sunday()
}

/// Month picker bounds: January of the current year through the current month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthNav {
    pub selected: YearMonth,
    current: YearMonth,
}

impl MonthNav {
    pub fn new(today: NaiveDate) -> Self {
        let current = YearMonth::of(today);
        Self {
            selected: current,
            current,
        }
    }

    pub fn can_go_previous(&self) -> bool {
        self.selected > self.earliest()
    }

    pub fn can_go_next(&self) -> bool {
        self.selected < self.current
    }

    pub fn go_previous(&mut self) -> bool {
        let allowed = self.can_go_previous();
        if allowed {
            self.selected = self.selected.previous();
        }
        allowed
    }

    pub fn go_next(&mut self) -> bool {
        let allowed = self.can_go_next();
        if allowed {
            self.selected = self.selected.next();
        }
        allowed
    }

    /// Jump to `month` if it is selectable.
    pub fn select(&mut self, month: YearMonth) -> bool {
        let allowed = month >= self.earliest() && month <= self.current;
        if allowed {
            self.selected = month;
        }
        allowed
    }

    pub fn selectable(&self) -> Vec<YearMonth> {
        (1..=self.current.month)
            .filter_map(|m| YearMonth::new(self.current.year, m))
            .collect()
    }

    fn earliest(&self) -> YearMonth {
        YearMonth {
            year: self.current.year,
            month: 1,
        }
    }
}
