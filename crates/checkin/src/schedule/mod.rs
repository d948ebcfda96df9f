//! Punctuality classification of attendance records.

mod classifier;
mod policy;

pub use classifier::StatusClassifier;
pub use policy::{ExpectedTime, WeekdayRule, WeekdaySchedule};
