//! Digit verification against a challenge.

use asistencia_common::Challenge;

/// Checks submitted digits against the challenge positions
#[derive(Debug, Default, Clone, Copy)]
pub struct DigitValidator;

impl DigitValidator {
    /// True iff `first` is exactly the character at `position_a` and
    /// `second` exactly the character at `position_b` (1-based).
    ///
    /// Never fails: empty or oversized submissions simply don't match.
    pub fn validate(&self, challenge: &Challenge, identity: &str, first: &str, second: &str) -> bool {
        matches_position(identity, challenge.position_a(), first)
            && matches_position(identity, challenge.position_b(), second)
    }
}

fn matches_position(identity: &str, position: usize, submitted: &str) -> bool {
    let Some(index) = position.checked_sub(1) else {
        return false;
    };

    let mut given = submitted.chars();
    match (identity.chars().nth(index), given.next(), given.next()) {
        (Some(expected), Some(actual), None) => expected == actual,
        _ => false,
    }
}
