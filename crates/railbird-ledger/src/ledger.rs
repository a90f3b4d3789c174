//! Balance and win/loss management.
//!
//! All mutations are atomic: either the full operation succeeds or the
//! profile is unchanged. `reserve` is the single check-and-debit point for
//! stakes, so two bets by the same identity can never both pass against the
//! same balance.

use std::collections::HashMap;

use railbird_types::{PlayerId, Profile, RailbirdError, Result};

use crate::conservation::Conservation;

/// Manages player profiles: balances, wins, losses.
///
/// The Ledger is the source of truth for all money state. Match code never
/// holds balances of its own — it reserves and credits through here, and
/// every grant/stake/payout is mirrored into the [`Conservation`] audit.
pub struct Ledger {
    /// Per-player profiles.
    profiles: HashMap<PlayerId, Profile>,
    /// Grant given to new profiles.
    starting_balance: u64,
    /// Mint/burn audit trail.
    conservation: Conservation,
}

impl Ledger {
    /// Create an empty ledger with the given starting grant.
    #[must_use]
    pub fn new(starting_balance: u64) -> Self {
        Self {
            profiles: HashMap::new(),
            starting_balance,
            conservation: Conservation::new(),
        }
    }

    /// Fetch a profile, creating it with the starting grant if absent.
    pub fn get_or_create(&mut self, player: &PlayerId) -> &Profile {
        self.profiles.entry(player.clone()).or_insert_with(|| {
            tracing::info!(%player, grant = self.starting_balance, "new profile");
            self.conservation.record_mint(self.starting_balance);
            Profile::new(self.starting_balance)
        })
    }

    /// Read a profile without creating it.
    #[must_use]
    pub fn profile(&self, player: &PlayerId) -> Option<Profile> {
        self.profiles.get(player).cloned()
    }

    /// Current balance, zero for unknown players.
    #[must_use]
    pub fn balance(&self, player: &PlayerId) -> u64 {
        self.profiles.get(player).map_or(0, |p| p.balance)
    }

    /// Atomically check and debit a stake.
    ///
    /// The debit is immediate, not a hold: the stake is gone from the
    /// balance until settlement credits a payout back.
    ///
    /// # Errors
    /// - [`RailbirdError::UnknownPlayer`] if no profile exists
    /// - [`RailbirdError::InsufficientFunds`] if balance < amount; the
    ///   balance is unchanged
    pub fn reserve(&mut self, player: &PlayerId, amount: u64) -> Result<()> {
        let profile = self
            .profiles
            .get_mut(player)
            .ok_or_else(|| RailbirdError::UnknownPlayer(player.clone()))?;

        if profile.balance < amount {
            return Err(RailbirdError::InsufficientFunds {
                needed: amount,
                available: profile.balance,
            });
        }

        profile.balance -= amount;
        self.conservation.record_burn(amount);
        tracing::debug!(%player, amount, balance = profile.balance, "stake reserved");
        Ok(())
    }

    /// Credit a payout (or a refund of a neutralized bet).
    ///
    /// # Errors
    /// - [`RailbirdError::UnknownPlayer`] if no profile exists
    /// - [`RailbirdError::BalanceOverflow`] if the counter would overflow;
    ///   the balance is unchanged
    pub fn credit(&mut self, player: &PlayerId, amount: u64) -> Result<()> {
        let profile = self
            .profiles
            .get_mut(player)
            .ok_or_else(|| RailbirdError::UnknownPlayer(player.clone()))?;

        profile.balance = profile
            .balance
            .checked_add(amount)
            .ok_or_else(|| RailbirdError::BalanceOverflow(player.clone()))?;
        self.conservation.record_mint(amount);
        tracing::debug!(%player, amount, balance = profile.balance, "credit applied");
        Ok(())
    }

    /// Record a settled race in the profile's win/loss counters.
    ///
    /// # Errors
    /// Returns [`RailbirdError::UnknownPlayer`] if no profile exists.
    pub fn record_outcome(&mut self, player: &PlayerId, won: bool) -> Result<()> {
        let profile = self
            .profiles
            .get_mut(player)
            .ok_or_else(|| RailbirdError::UnknownPlayer(player.clone()))?;
        if won {
            profile.wins += 1;
        } else {
            profile.losses += 1;
        }
        Ok(())
    }

    /// Administrative removal of a profile. The removed balance is recorded
    /// as burned so the conservation audit stays balanced.
    pub fn remove(&mut self, player: &PlayerId) -> Option<Profile> {
        let removed = self.profiles.remove(player);
        if let Some(profile) = &removed {
            self.conservation.record_burn(profile.balance);
            tracing::info!(%player, "profile removed");
        }
        removed
    }

    /// Sum of all balances.
    #[must_use]
    pub fn total_balance(&self) -> u64 {
        self.profiles.values().map(|p| p.balance).sum()
    }

    /// Verify that Σ balances == minted − burned.
    ///
    /// # Errors
    /// Returns [`RailbirdError::ConservationViolation`] on mismatch.
    pub fn verify_conservation(&self) -> Result<()> {
        self.conservation.verify(self.total_balance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> PlayerId {
        PlayerId::new("alice")
    }

    #[test]
    fn get_or_create_grants_starting_balance() {
        let mut ledger = Ledger::new(100);
        let profile = ledger.get_or_create(&alice());
        assert_eq!(profile.balance, 100);
        assert_eq!(profile.wins, 0);
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut ledger = Ledger::new(100);
        ledger.get_or_create(&alice());
        ledger.reserve(&alice(), 30).unwrap();
        // A second authentication must not re-grant.
        let profile = ledger.get_or_create(&alice());
        assert_eq!(profile.balance, 70);
    }

    #[test]
    fn identity_is_case_insensitive() {
        let mut ledger = Ledger::new(100);
        ledger.get_or_create(&PlayerId::new("Alice"));
        ledger.reserve(&PlayerId::new("ALICE"), 10).unwrap();
        assert_eq!(ledger.balance(&alice()), 90);
    }

    #[test]
    fn reserve_debits_immediately() {
        let mut ledger = Ledger::new(100);
        ledger.get_or_create(&alice());
        ledger.reserve(&alice(), 40).unwrap();
        assert_eq!(ledger.balance(&alice()), 60);
    }

    #[test]
    fn reserve_insufficient_fails_unchanged() {
        let mut ledger = Ledger::new(100);
        ledger.get_or_create(&alice());
        let err = ledger.reserve(&alice(), 200).unwrap_err();
        assert!(matches!(
            err,
            RailbirdError::InsufficientFunds {
                needed: 200,
                available: 100
            }
        ));
        assert_eq!(ledger.balance(&alice()), 100);
    }

    #[test]
    fn reserve_whole_balance_allowed() {
        let mut ledger = Ledger::new(100);
        ledger.get_or_create(&alice());
        ledger.reserve(&alice(), 100).unwrap();
        assert_eq!(ledger.balance(&alice()), 0);
        // Nothing left to back another stake.
        assert!(ledger.reserve(&alice(), 1).is_err());
    }

    #[test]
    fn same_balance_cannot_back_two_stakes() {
        // Two matches, one identity: the second reserve must see the
        // already-debited balance.
        let mut ledger = Ledger::new(100);
        ledger.get_or_create(&alice());
        ledger.reserve(&alice(), 80).unwrap();
        let err = ledger.reserve(&alice(), 80).unwrap_err();
        assert!(matches!(err, RailbirdError::InsufficientFunds { .. }));
    }

    #[test]
    fn reserve_unknown_player_fails() {
        let mut ledger = Ledger::new(100);
        let err = ledger.reserve(&alice(), 10).unwrap_err();
        assert!(matches!(err, RailbirdError::UnknownPlayer(_)));
    }

    #[test]
    fn credit_adds_to_balance() {
        let mut ledger = Ledger::new(100);
        ledger.get_or_create(&alice());
        ledger.credit(&alice(), 25).unwrap();
        assert_eq!(ledger.balance(&alice()), 125);
    }

    #[test]
    fn credit_overflow_fails_unchanged() {
        let mut ledger = Ledger::new(u64::MAX);
        ledger.get_or_create(&alice());
        let err = ledger.credit(&alice(), 1).unwrap_err();
        assert!(matches!(err, RailbirdError::BalanceOverflow(_)));
        assert_eq!(ledger.balance(&alice()), u64::MAX);
    }

    #[test]
    fn record_outcome_bumps_counters() {
        let mut ledger = Ledger::new(100);
        ledger.get_or_create(&alice());
        ledger.record_outcome(&alice(), true).unwrap();
        ledger.record_outcome(&alice(), false).unwrap();
        ledger.record_outcome(&alice(), false).unwrap();
        let profile = ledger.profile(&alice()).unwrap();
        assert_eq!(profile.wins, 1);
        assert_eq!(profile.losses, 2);
    }

    #[test]
    fn remove_returns_profile() {
        let mut ledger = Ledger::new(100);
        ledger.get_or_create(&alice());
        let removed = ledger.remove(&alice()).unwrap();
        assert_eq!(removed.balance, 100);
        assert!(ledger.profile(&alice()).is_none());
        ledger.verify_conservation().unwrap();
    }

    #[test]
    fn conservation_holds_through_mutations() {
        let mut ledger = Ledger::new(100);
        let bob = PlayerId::new("bob");
        ledger.get_or_create(&alice());
        ledger.get_or_create(&bob);
        ledger.reserve(&alice(), 10).unwrap();
        ledger.reserve(&bob, 12).unwrap();
        ledger.credit(&alice(), 12).unwrap();
        ledger.verify_conservation().unwrap();
        assert_eq!(ledger.total_balance(), 100 + 100 - 10 - 12 + 12);
    }
}
