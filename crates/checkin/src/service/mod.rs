//! Remote attendance service: contract and HTTP implementation.

mod client;

pub use client::HttpAttendanceService;

use asistencia_common::error::Operation;
use asistencia_common::{AttendanceError, AttendanceRecord};
use async_trait::async_trait;
use serde::Serialize;

/// Check-in request body.
///
/// The service expects the record id twice: as the person's record and as
/// the join identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInRequest {
    pub record_user: i64,
    pub join_user: i64,
}

impl CheckInRequest {
    pub fn for_record(record_id: i64) -> Self {
        Self {
            record_user: record_id,
            join_user: record_id,
        }
    }
}

/// Acknowledgment returned for a check-in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckInAck {
    pub message: Option<String>,
}

impl CheckInAck {
    /// Build from an arbitrary JSON body; anything without a string
    /// `message` yields an empty acknowledgment.
    pub fn from_json(body: &serde_json::Value) -> Self {
        Self {
            message: body
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
        }
    }

    /// Whether the message carries the confirmation marker
    pub fn is_confirmed(&self, marker: &str) -> bool {
        self.message.as_deref().is_some_and(|m| m.contains(marker))
    }
}

/// Errors from the attendance service layer
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decoding)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status
    #[error("Attendance service returned HTTP {0}")]
    HttpStatus(u16),
}

impl ServiceError {
    /// Classify as a transport failure for the given operation
    pub fn into_attendance_error(self, operation: Operation) -> AttendanceError {
        AttendanceError::TransportFailure {
            operation,
            reason: self.to_string(),
        }
    }
}

/// The remote record-keeping service
#[async_trait]
pub trait AttendanceService: Send + Sync {
    /// Fetch the attendance history of a record. Malformed payloads yield an
    /// empty history, not an error.
    async fn fetch_records(&self, record_id: i64) -> Result<Vec<AttendanceRecord>, ServiceError>;

    /// Submit a check-in
    async fn submit_check_in(&self, request: &CheckInRequest) -> Result<CheckInAck, ServiceError>;
}
