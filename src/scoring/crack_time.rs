// maps a guess count onto attack durations and a coarse 0..=4 score

use serde::Serialize;

/// seconds an attacker needs under four standard attack scenarios
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CrackTimesSeconds {
    /// online attack against a rate-limited service, 100 guesses per hour
    pub online_throttling_100_per_hour: f64,
    /// online attack with no rate limiting, 10 guesses per second
    pub online_no_throttling_10_per_second: f64,
    /// offline attack against a slow hash, 10k guesses per second
    pub offline_slow_hashing_1e4_per_second: f64,
    /// offline attack against a fast hash, 10 billion guesses per second
    pub offline_fast_hashing_1e10_per_second: f64,
}

pub fn estimate_attack_times(guesses: f64) -> CrackTimesSeconds {
    CrackTimesSeconds {
        online_throttling_100_per_hour: guesses / (100.0 / 3600.0),
        online_no_throttling_10_per_second: guesses / 10.0,
        offline_slow_hashing_1e4_per_second: guesses / 1e4,
        offline_fast_hashing_1e10_per_second: guesses / 1e10,
    }
}

// a sequence of length l carries a +D^(l-1) term; the slack keeps guess
// counts sitting exactly on a threshold from flapping between scores
const SCORE_DELTA: f64 = 5.0;

/// collapses a guess count to a score from 0 (too guessable) to 4 (very
/// unguessable)
pub fn guesses_to_score(guesses: f64) -> u8 {
    if guesses < 1e3 + SCORE_DELTA {
        0
    } else if guesses < 1e6 + SCORE_DELTA {
        1
    } else if guesses < 1e8 + SCORE_DELTA {
        2
    } else if guesses < 1e10 + SCORE_DELTA {
        3
    } else {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_thresholds() {
        assert_eq!(guesses_to_score(1.0), 0);
        assert_eq!(guesses_to_score(1e3), 0);
        assert_eq!(guesses_to_score(1e3 + 6.0), 1);
        assert_eq!(guesses_to_score(1e6 + 6.0), 2);
        assert_eq!(guesses_to_score(1e8 + 6.0), 3);
        assert_eq!(guesses_to_score(1e10 + 6.0), 4);
    }

    #[test]
    fn attack_times_scale_linearly() {
        let times = estimate_attack_times(3600.0);
        assert_eq!(times.online_throttling_100_per_hour, 36.0 * 3600.0);
        assert_eq!(times.online_no_throttling_10_per_second, 360.0);
        assert_eq!(times.offline_slow_hashing_1e4_per_second, 0.36);
        assert!((times.offline_fast_hashing_1e10_per_second - 3.6e-7).abs() < 1e-15);
    }
}
