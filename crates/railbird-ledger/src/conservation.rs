//! Money conservation invariant checker.
//!
//! Pooled-odds settlement is not zero-sum — the house mints payouts and
//! burns stakes — so the invariant is not "supply never changes" but:
//! ```text
//! Σ balances == Σ minted (grants + payouts) − Σ burned (stakes + removals)
//! ```
//! If this ever breaks, money was created or destroyed outside the ledger's
//! three mutation points. That is a critical defect, never a recoverable
//! condition.

use railbird_types::{RailbirdError, Result};

/// Tracks lifetime mint/burn totals and validates the balance sum.
#[derive(Debug, Default)]
pub struct Conservation {
    /// Units ever created: starting grants and settlement payouts.
    minted: u64,
    /// Units ever destroyed: reserved stakes and removed profiles.
    burned: u64,
}

impl Conservation {
    /// Create a new tracker with zero history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record created units.
    pub fn record_mint(&mut self, amount: u64) {
        self.minted = self.minted.saturating_add(amount);
    }

    /// Record destroyed units.
    pub fn record_burn(&mut self, amount: u64) {
        self.burned = self.burned.saturating_add(amount);
    }

    /// Expected sum of all balances: minted − burned.
    #[must_use]
    pub fn expected_total(&self) -> u64 {
        self.minted.saturating_sub(self.burned)
    }

    /// Verify the actual balance sum against the mint/burn history.
    ///
    /// # Errors
    /// Returns [`RailbirdError::ConservationViolation`] if actual ≠ expected.
    pub fn verify(&self, actual_total: u64) -> Result<()> {
        let expected = self.expected_total();
        if actual_total != expected {
            return Err(RailbirdError::ConservationViolation {
                reason: format!(
                    "actual total {actual_total} != expected {expected} \
                     (minted={}, burned={})",
                    self.minted, self.burned
                ),
            });
        }
        Ok(())
    }
}
