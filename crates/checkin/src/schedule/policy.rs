//! Weekday policy table: day-name overrides and expected check-in times.

use asistencia_common::constants::{DEFAULT_EXPECTED_HOUR, DEFAULT_EXPECTED_MINUTE};
use chrono::Weekday;
use std::fmt;

/// Expected check-in time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExpectedTime {
    pub hour: u32,
    pub minute: u32,
}

impl ExpectedTime {
    /// Expected time for days without a specific rule
    pub const STANDARD: Self = Self::new(DEFAULT_EXPECTED_HOUR, DEFAULT_EXPECTED_MINUTE);

    pub const fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }
}

impl fmt::Display for ExpectedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Policy for a single weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayRule {
    /// Fixed spelling, bypassing locale names
    pub name_override: Option<&'static str>,
    pub expected: ExpectedTime,
}

impl WeekdayRule {
    const fn standard() -> Self {
        Self {
            name_override: None,
            expected: ExpectedTime::STANDARD,
        }
    }

    const fn named(name: &'static str, expected: ExpectedTime) -> Self {
        Self {
            name_override: Some(name),
            expected,
        }
    }
}

/// es-ES weekday names, Monday first
const ES_WEEKDAYS: [&str; 7] = [
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
    "domingo",
];

/// Rules indexed by days from Monday
const DEFAULT_RULES: [WeekdayRule; 7] = [
    WeekdayRule::standard(),
    WeekdayRule::standard(),
    WeekdayRule::named("Miércoles", ExpectedTime::new(17, 0)),
    WeekdayRule::standard(),
    WeekdayRule::standard(),
    WeekdayRule::named("Sábado", ExpectedTime::STANDARD),
    WeekdayRule::standard(),
];

/// Weekly schedule used by the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdaySchedule {
    rules: [WeekdayRule; 7],
}

impl WeekdaySchedule {
    pub fn new(rules: [WeekdayRule; 7]) -> Self {
        Self { rules }
    }

    pub fn rule(&self, weekday: Weekday) -> &WeekdayRule {
        &self.rules[weekday.num_days_from_monday() as usize]
    }

    /// Override when the table has one, locale name otherwise
    pub fn day_name(&self, weekday: Weekday) -> &'static str {
        self.rule(weekday)
            .name_override
            .unwrap_or(ES_WEEKDAYS[weekday.num_days_from_monday() as usize])
    }

    pub fn expected_time(&self, weekday: Weekday) -> ExpectedTime {
        self.rule(weekday).expected
    }

    /// Expected time for records whose date can't be read
    pub fn fallback_expected(&self) -> ExpectedTime {
        ExpectedTime::STANDARD
    }
}

impl Default for WeekdaySchedule {
    fn default() -> Self {
        Self::new(DEFAULT_RULES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_and_locale_names() {
        let schedule = WeekdaySchedule::default();
        assert_eq!(schedule.day_name(Weekday::Wed), "Miércoles");
        assert_eq!(schedule.day_name(Weekday::Sat), "Sábado");
        assert_eq!(schedule.day_name(Weekday::Mon), "lunes");
        assert_eq!(schedule.day_name(Weekday::Sun), "domingo");
    }

    #[test]
    fn test_only_wednesday_differs() {
        let schedule = WeekdaySchedule::default();
        for weekday in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert_eq!(schedule.expected_time(weekday), ExpectedTime::STANDARD);
        }
        assert_eq!(schedule.expected_time(Weekday::Wed).to_string(), "17:00");
        assert_eq!(schedule.fallback_expected().to_string(), "08:00");
    }

    #[test]
    fn test_custom_table() {
        let mut rules = DEFAULT_RULES;
        rules[4] = WeekdayRule::named("Viernes", ExpectedTime::new(9, 30));
        let schedule = WeekdaySchedule::new(rules);
        assert_eq!(schedule.day_name(Weekday::Fri), "Viernes");
        assert_eq!(schedule.expected_time(Weekday::Fri).minutes_since_midnight(), 570);
    }
}
