//! Core types shared across the attendance client.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::AttendanceError;

/// The enrolled person's session, produced by the login flow.
///
/// Immutable for the lifetime of the attendance view. The engine only reads
/// `record_id` and `identity_number`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Numeric record identifier at the attendance service
    pub record_id: i64,

    /// Identity document number the challenge is drawn from
    pub identity_number: String,

    pub given_names: String,

    pub family_names: String,

    pub username: String,
}

impl Session {
    /// Full display name ("given family")
    pub fn display_name(&self) -> String {
        if self.family_names.is_empty() {
            self.given_names.clone()
        } else {
            format!("{} {}", self.given_names, self.family_names)
        }
    }
}

/// Two 1-based positions into the identity number the user must answer.
///
/// Only positions are ever exposed; the expected digits stay in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Challenge {
    position_a: usize,
    position_b: usize,
}

impl Challenge {
    /// Build a challenge from two 1-based positions, in any order.
    ///
    /// Fails with `InsufficientLength` when the positions coincide or one of
    /// them falls outside `[1, length]`.
    pub fn from_positions(a: usize, b: usize, length: usize) -> Result<Self, AttendanceError> {
        let (position_a, position_b) = if a <= b { (a, b) } else { (b, a) };
        if position_a == 0 || position_a == position_b || position_b > length {
            return Err(AttendanceError::InsufficientLength { length });
        }
        Ok(Self {
            position_a,
            position_b,
        })
    }

    pub fn position_a(&self) -> usize {
        self.position_a
    }

    pub fn position_b(&self) -> usize {
        self.position_b
    }
}

/// A raw attendance entry as returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Service-side sequence number (`record` on the wire, number or numeric string)
    #[serde(rename = "record", deserialize_with = "lenient_i64")]
    pub sequence_id: i64,

    /// Calendar date as stored (`YYYY-MM-DD`), empty when missing
    #[serde(default, deserialize_with = "nullable_string")]
    pub date: String,

    /// Wall-clock time as stored (`HH:MM:SS`), empty when nothing was recorded
    #[serde(default, deserialize_with = "nullable_string")]
    pub time: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub join_date: String,
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| de::Error::custom(format!("record id out of range: {n}"))),
        serde_json::Value::String(s) => s.trim().parse().map_err(de::Error::custom),
        other => Err(de::Error::custom(format!("invalid record id: {other}"))),
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Classification outcome for a single attendance entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    OnTime,
    Late,
    NoRecord,
}

impl Verdict {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTime => "En hora",
            Self::Late => "Atraso",
            Self::NoRecord => "Sin registro",
        }
    }
}

/// A record enriched for display. Always derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecoratedRecord {
    pub day_name: String,
    pub formatted_date: String,
    /// Recorded time after offset compensation (`HH:MM`), empty when absent
    pub adjusted_time: String,
    pub expected_time: String,
    pub verdict: Verdict,
}

/// One page of decorated history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    /// Zero-based page index
    pub page_index: usize,
    pub page_size: usize,
    /// Always at least 1, even for an empty history
    pub total_pages: usize,
    /// Size of the full record set
    pub total_records: usize,
    /// Whether navigation controls are needed
    pub has_multiple_pages: bool,
    pub items: Vec<DecoratedRecord>,
}

impl PageView {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Submission coordinator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorState {
    /// Nothing entered since the last resolution
    Idle,
    /// At least one digit entered, or the last attempt needs new input
    AwaitingInput,
    /// Checking digits against the challenge
    Validating,
    /// Check-in request in flight
    Submitting,
    /// Service confirmed the check-in
    Success,
    /// Service rejected the check-in or could not be reached
    Failed,
}

impl Default for CoordinatorState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Severity of a notice shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Danger,
}

/// Last message for the presentation layer to display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }
}

impl From<&AttendanceError> for Notice {
    fn from(err: &AttendanceError) -> Self {
        Self {
            level: err.level(),
            message: err.user_message().to_string(),
        }
    }
}

/// Which of the two digit inputs a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitSlot {
    First,
    Second,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_orders_positions() {
        let challenge = Challenge::from_positions(7, 2, 10).unwrap();
        assert_eq!(challenge.position_a(), 2);
        assert_eq!(challenge.position_b(), 7);
    }

    #[test]
    fn test_challenge_rejects_invalid_positions() {
        assert!(Challenge::from_positions(3, 3, 10).is_err());
        assert!(Challenge::from_positions(0, 3, 10).is_err());
        assert!(Challenge::from_positions(2, 11, 10).is_err());
    }

    #[test]
    fn test_challenge_serializes_positions_only() {
        let challenge = Challenge::from_positions(1, 4, 10).unwrap();
        let json = serde_json::to_value(challenge).unwrap();
        assert_eq!(json, serde_json::json!({ "position_a": 1, "position_b": 4 }));
    }

    #[test]
    fn test_record_accepts_string_ids_and_null_time() {
        let json = r#"{"record": "42", "date": "2024-05-07", "time": null, "join_date": "15"}"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.sequence_id, 42);
        assert_eq!(record.time, "");
        assert_eq!(record.join_date, "15");
    }

    #[test]
    fn test_record_accepts_numeric_ids() {
        let json = r#"{"record": 7, "date": "2024-05-07", "time": "08:01:00"}"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.sequence_id, 7);
        assert_eq!(record.join_date, "");
    }

    #[test]
    fn test_record_missing_or_null_date_is_empty() {
        let missing: AttendanceRecord = serde_json::from_str(r#"{"record": 1}"#).unwrap();
        let null: AttendanceRecord =
            serde_json::from_str(r#"{"record": 2, "date": null}"#).unwrap();
        assert_eq!(missing.date, "");
        assert_eq!(null.date, "");
    }

    #[test]
    fn test_notice_from_error() {
        let notice = Notice::from(&AttendanceError::MissingInput);
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, "Por favor, ingrese ambos dígitos");
    }
}
