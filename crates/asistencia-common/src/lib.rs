//! # Asistencia Common
//!
//! Shared types, errors, and constants used across the attendance client.
//!
//! ## Modules
//! - `types` - Core data structures (Session, Challenge, AttendanceRecord, etc.)
//! - `error` - The attendance error taxonomy
//! - `constants` - Shared policy constants

pub mod constants;
pub mod error;
pub mod types;

pub use error::AttendanceError;
pub use types::*;
