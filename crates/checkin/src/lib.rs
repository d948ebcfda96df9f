//! # Checkin
//!
//! Attendance check-in engine: proves possession of an identity number with
//! a two-digit challenge, submits check-ins to the attendance service, and
//! classifies the returned history as on time, late, or unrecorded.
//!
//! ## Architecture
//! ```text
//! SessionStore → SubmissionCoordinator ──→ AttendanceService (HTTP)
//!                  │        │
//!                  │        └→ StatusClassifier → PageCursor → PageView
//!                  └→ ChallengeGenerator / DigitValidator
//! ```

pub mod challenge;
pub mod config;
pub mod coordinator;
pub mod pagination;
pub mod report;
pub mod schedule;
pub mod service;
pub mod session;

pub use coordinator::{CoordinatorSettings, SubmissionCoordinator};
