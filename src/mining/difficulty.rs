use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Proof-of-work target expressed as a count of leading `'0'` hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyTarget {
    pub difficulty: u32,
}

impl DifficultyTarget {
    pub fn new(difficulty: u32) -> Self {
        Self { difficulty }
    }

    /// The required prefix, e.g. `"0000"` for difficulty 4.
    pub fn prefix(&self) -> String {
        "0".repeat(self.difficulty as usize)
    }

    pub fn is_met_by(&self, hash_hex: &str) -> bool {
        let required = self.difficulty as usize;
        hash_hex.len() >= required && hash_hex.bytes().take(required).all(|b| b == b'0')
    }

    /// Mean number of hashes needed: each hex digit is zero with probability 1/16.
    pub fn expected_attempts(&self) -> f64 {
        16f64.powi(i32::try_from(self.difficulty).unwrap_or(i32::MAX))
    }

    /// `None` for a non-positive hashrate or an estimate too large for a `Duration`.
    pub fn estimate_time(&self, hashrate: f64) -> Option<Duration> {
        if hashrate <= 0.0 {
            return None;
        }

        Duration::try_from_secs_f64(self.expected_attempts() / hashrate).ok()
    }
}

impl From<u32> for DifficultyTarget {
    fn from(difficulty: u32) -> Self {
        Self::new(difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix() {
        assert_eq!(DifficultyTarget::new(0).prefix(), "");
        assert_eq!(DifficultyTarget::new(4).prefix(), "0000");
    }

    #[test]
    fn test_target_matching() {
        let target = DifficultyTarget::new(2);

        assert!(target.is_met_by("00ab"));
        assert!(target.is_met_by("000f"));
        assert!(!target.is_met_by("0a00"));
        assert!(!target.is_met_by("0"));
    }

    #[test]
    fn test_zero_difficulty_accepts_anything() {
        let target = DifficultyTarget::new(0);
        assert!(target.is_met_by("ffff"));
        assert!(target.is_met_by(""));
    }

    #[test]
    fn test_time_estimation() {
        let target = DifficultyTarget::new(2);
        assert_eq!(target.expected_attempts(), 256.0);
        assert_eq!(target.estimate_time(256.0), Some(Duration::from_secs(1)));
        assert_eq!(target.estimate_time(0.0), None);

        let harder = DifficultyTarget::new(3).estimate_time(256.0).unwrap();
        assert!(harder > Duration::from_secs(1));
    }

    #[test]
    fn test_huge_difficulty_saturates() {
        let target = DifficultyTarget::new(u32::MAX);

        assert_eq!(target.expected_attempts(), f64::INFINITY);
        assert!(target.expected_attempts() > DifficultyTarget::new(64).expected_attempts());
        assert_eq!(target.estimate_time(1_000_000.0), None);
    }
}
