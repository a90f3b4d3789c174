//! Race state: contestants, the live run, and seed derivation.
//!
//! A [`RaceRun`] is created when a match enters RUNNING and is owned by that
//! match. Positions only ever move forward; once a winner is latched the run
//! is immutable apart from the single-use settlement latch.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::MatchId;

// ---------------------------------------------------------------------------
// Horse
// ---------------------------------------------------------------------------

/// A race contestant, numbered from 1 (lane order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Horse(pub u8);

impl Horse {
    /// The 1-based contestant number.
    #[must_use]
    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based index into position/speed/pool vectors.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0.saturating_sub(1))
    }

    /// Whether this number is a valid contestant in a field of `count`.
    #[must_use]
    pub fn in_field(self, count: u8) -> bool {
        self.0 >= 1 && self.0 <= count
    }
}

impl fmt::Display for Horse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "horse:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RaceRun
// ---------------------------------------------------------------------------

/// Runtime state of one race.
///
/// Created at the RUNNING transition with per-horse speed coefficients drawn
/// once. The `settled` flag is the single-use settlement latch: it can only
/// ever flip `false → true`, which is what makes a duplicate race-end signal
/// harmless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceRun {
    /// Per-horse distance travelled. Monotonically non-decreasing.
    pub positions: Vec<f64>,
    /// Per-horse speed coefficient, drawn once at race start.
    pub speeds: Vec<f64>,
    /// Distance a horse must reach to finish.
    pub finish_line: f64,
    /// The winner, latched by the first finish-line crossing.
    pub winner: Option<Horse>,
    /// Single-use settlement latch. Private: only [`RaceRun::latch_settled`]
    /// can flip it.
    settled: bool,
}

impl RaceRun {
    /// Start a run: all positions at zero, no winner, not settled.
    #[must_use]
    pub fn new(speeds: Vec<f64>, finish_line: f64) -> Self {
        let positions = vec![0.0; speeds.len()];
        Self {
            positions,
            speeds,
            finish_line,
            winner: None,
            settled: false,
        }
    }

    /// Number of contestants in this run.
    #[must_use]
    pub fn horse_count(&self) -> usize {
        self.speeds.len()
    }

    /// Whether payouts for this run have already been applied.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Flip the single-use settlement latch.
    ///
    /// Returns `true` exactly once; every later call returns `false` and
    /// changes nothing. Callers must apply payouts only on `true`.
    pub fn latch_settled(&mut self) -> bool {
        if self.settled {
            return false;
        }
        self.settled = true;
        true
    }
}

// ---------------------------------------------------------------------------
// Seed derivation
// ---------------------------------------------------------------------------

/// Derive a race RNG seed from the match identity and a fresh nonce.
///
/// Format: `SHA-256("railbird:race_seed:v1:" || match_id || nonce)`,
/// truncated to the first 8 bytes (little-endian). The same
/// (match, nonce) pair always yields the same seed, which is what lets a
/// recorded race be replayed step for step.
#[must_use]
pub fn race_seed(match_id: MatchId, nonce: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(b"railbird:race_seed:v1:");
    hasher.update(match_id.0.as_bytes());
    hasher.update(nonce.to_le_bytes());
    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash[..8].try_into().expect("SHA-256 produces 32 bytes");
    u64::from_le_bytes(bytes)
}
