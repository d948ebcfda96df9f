//! Challenge position generation.

use asistencia_common::{AttendanceError, Challenge};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed indices
pub trait IndexSource {
    /// Pick an index in `0..len`. Callers never pass `len == 0`.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// OS-seeded randomness for production use
pub struct SystemRandom(StdRng);

impl SystemRandom {
    pub fn new() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Reproducible source, for demos and tests
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexSource for SystemRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

/// Challenge generator service
pub struct ChallengeGenerator<R> {
    source: R,
}

impl<R: IndexSource> ChallengeGenerator<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Generate a challenge for the given identity number.
    ///
    /// Draws the first position from all `L` slots and the second from the
    /// remaining `L - 1`, stepping over the first, so every unordered pair is
    /// equally likely and no retry loop is needed.
    pub fn generate(&mut self, identity: &str) -> Result<Challenge, AttendanceError> {
        let length = identity.chars().count();
        if length < 2 {
            return Err(AttendanceError::InsufficientLength { length });
        }

        let first = self.source.pick_index(length) % length;
        let mut second = self.source.pick_index(length - 1) % (length - 1);
        if second >= first {
            second += 1;
        }

        let challenge = Challenge::from_positions(first + 1, second + 1, length)?;

        tracing::debug!(
            position_a = challenge.position_a(),
            position_b = challenge.position_b(),
            "Generated identity challenge"
        );

        Ok(challenge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a fixed list of indices
    struct ScriptedIndices(VecDeque<usize>);

    impl IndexSource for ScriptedIndices {
        fn pick_index(&mut self, len: usize) -> usize {
            self.0.pop_front().unwrap_or(0) % len
        }
    }

    fn scripted(indices: &[usize]) -> ChallengeGenerator<ScriptedIndices> {
        ChallengeGenerator::new(ScriptedIndices(indices.iter().copied().collect()))
    }

    #[test]
    fn test_positions_in_range_and_ordered() {
        let mut generator = ChallengeGenerator::new(SystemRandom::seeded(7));

        for length in 2..=13 {
            let identity: String = "1234567890123".chars().take(length).collect();
            for _ in 0..500 {
                let challenge = generator.generate(&identity).unwrap();
                assert!(challenge.position_a() >= 1);
                assert!(challenge.position_a() < challenge.position_b());
                assert!(challenge.position_b() <= length);
            }
        }
    }

    #[test]
    fn test_same_pick_twice_still_distinct() {
        // Both draws return index 3: the second steps over the first
        let challenge = scripted(&[3, 3]).generate("1712345678").unwrap();
        assert_eq!(challenge.position_a(), 4);
        assert_eq!(challenge.position_b(), 5);
    }

    #[test]
    fn test_positions_sorted_ascending() {
        let challenge = scripted(&[8, 1]).generate("1712345678").unwrap();
        assert_eq!(challenge.position_a(), 2);
        assert_eq!(challenge.position_b(), 9);
    }

    #[test]
    fn test_two_character_identity_covers_both() {
        let mut generator = ChallengeGenerator::new(SystemRandom::seeded(1));
        for _ in 0..50 {
            let challenge = generator.generate("42").unwrap();
            assert_eq!((challenge.position_a(), challenge.position_b()), (1, 2));
        }
    }

    #[test]
    fn test_short_identity_rejected() {
        let mut generator = scripted(&[]);
        assert_eq!(
            generator.generate("7"),
            Err(AttendanceError::InsufficientLength { length: 1 })
        );
        assert_eq!(
            generator.generate(""),
            Err(AttendanceError::InsufficientLength { length: 0 })
        );
    }

    #[test]
    fn test_every_pair_reachable() {
        let mut generator = ChallengeGenerator::new(SystemRandom::seeded(99));
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2_000 {
            let c = generator.generate("12345").unwrap();
            seen.insert((c.position_a(), c.position_b()));
        }
        // C(5, 2)
        assert_eq!(seen.len(), 10);
    }
}
