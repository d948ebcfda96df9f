//! Identity challenge generation and verification.
//!
//! The user proves possession of their identity document by typing the
//! digits found at two randomly chosen positions of its number.

mod generator;
mod verifier;

pub use generator::{ChallengeGenerator, IndexSource, SystemRandom};
pub use verifier::DigitValidator;
