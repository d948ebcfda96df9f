//! Status classifier: turns a stored `(date, time)` pair into display fields
//! and an on-time/late verdict.
//!
//! Stored values are offset from what the person actually experienced: the
//! date sits one day behind and the clock one hour ahead. Both corrections
//! are applied before any weekday, formatting, or comparison decision.

use asistencia_common::constants::{CALENDAR_SHIFT_DAYS, CLOCK_OFFSET_HOURS};
use asistencia_common::{AttendanceRecord, DecoratedRecord, Verdict};
use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta, Timelike};

use super::policy::{ExpectedTime, WeekdaySchedule};

/// Pure, deterministic record classifier
#[derive(Debug, Clone, Default)]
pub struct StatusClassifier {
    schedule: WeekdaySchedule,
}

impl StatusClassifier {
    pub fn new(schedule: WeekdaySchedule) -> Self {
        Self { schedule }
    }

    pub fn decorate(&self, record: &AttendanceRecord) -> DecoratedRecord {
        self.classify(&record.date, &record.time)
    }

    /// Classify a stored date and time
    pub fn classify(&self, date: &str, time: &str) -> DecoratedRecord {
        let adjusted = adjust_time(time);
        let adjusted_time = adjusted
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default();

        let (day_name, formatted_date, expected) = match logical_date(date) {
            Some(day) => {
                let weekday = day.weekday();
                (
                    self.schedule.day_name(weekday).to_string(),
                    day.format("%d.%m.%Y").to_string(),
                    self.schedule.expected_time(weekday),
                )
            }
            None => {
                tracing::debug!(date = %date, "Unreadable record date, using defaults");
                (String::new(), date.to_string(), self.schedule.fallback_expected())
            }
        };

        DecoratedRecord {
            day_name,
            formatted_date,
            adjusted_time,
            expected_time: expected.to_string(),
            verdict: verdict(adjusted, expected),
        }
    }
}

/// Stored date shifted to the logical attendance date
fn logical_date(stored: &str) -> Option<NaiveDate> {
    let stored = stored.trim();
    let day_part = stored.get(..10).unwrap_or(stored);
    let day = NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()?;
    day.checked_add_signed(TimeDelta::days(CALENDAR_SHIFT_DAYS))
}

/// Stored wall-clock time with the offset removed, wrapping across midnight
fn adjust_time(stored: &str) -> Option<NaiveTime> {
    let stored = stored.trim();
    if stored.is_empty() {
        return None;
    }

    let parsed = NaiveTime::parse_from_str(stored, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(stored, "%H:%M"));

    match parsed {
        Ok(time) => Some(time - TimeDelta::hours(CLOCK_OFFSET_HOURS)),
        Err(e) => {
            tracing::debug!(time = %stored, error = %e, "Unreadable record time, treating as absent");
            None
        }
    }
}

fn verdict(adjusted: Option<NaiveTime>, expected: ExpectedTime) -> Verdict {
    match adjusted {
        None => Verdict::NoRecord,
        Some(time) => {
            let actual = time.hour() * 60 + time.minute();
            if actual <= expected.minutes_since_midnight() {
                Verdict::OnTime
            } else {
                Verdict::Late
            }
        }
    }
}
