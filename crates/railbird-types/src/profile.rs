//! Player profile: balance and lifetime win/loss record.

use serde::{Deserialize, Serialize};

/// Ledger state for one identity.
///
/// The balance is an unsigned integer number of currency units — it cannot
/// go negative by construction. Created on first authentication with the
/// configured starting grant; mutated only by bet reservation, settlement
/// credit, and outcome recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Spendable currency units.
    pub balance: u64,
    /// Lifetime races won.
    pub wins: u32,
    /// Lifetime races lost.
    pub losses: u32,
}

impl Profile {
    /// Fresh profile holding the starting grant.
    #[must_use]
    pub fn new(starting_balance: u64) -> Self {
        Self {
            balance: starting_balance,
            wins: 0,
            losses: 0,
        }
    }

    /// Total races this profile has settled.
    #[must_use]
    pub fn races(&self) -> u32 {
        self.wins + self.losses
    }
}
