//! Match registry — the sole owner of the id → match mapping.
//!
//! Every other component reaches a [`Match`] through here. The registry
//! hands out `&mut Match` for handler-scoped mutations and removes matches
//! once the last participant has left.

use std::collections::HashMap;

use railbird_ledger::Ledger;
use railbird_types::{ConnId, MatchId, PlayerId, RailbirdError, Result};

use crate::match_state::Match;

/// Outcome of a leave/disconnect removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// Stake credited back for a neutralized pending bet.
    pub refunded: u64,
    /// Whether the match lost its last participant and was removed.
    pub removed: bool,
}

/// Creates matches, tracks membership, and retires empty matches.
#[derive(Default)]
pub struct MatchRegistry {
    matches: HashMap<MatchId, Match>,
}

impl MatchRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new lobby match with `host` as the sole participant.
    pub fn create(&mut self, host: PlayerId, conn: ConnId, horses: u8) -> MatchId {
        let id = MatchId::new();
        tracing::info!(%id, %host, "match created");
        self.matches.insert(id, Match::new(id, host, conn, horses));
        id
    }

    /// Read access for all other components.
    ///
    /// # Errors
    /// Returns [`RailbirdError::MatchNotFound`] for unknown ids.
    pub fn get(&self, id: MatchId) -> Result<&Match> {
        self.matches.get(&id).ok_or(RailbirdError::MatchNotFound(id))
    }

    /// Handler-scoped mutable access.
    ///
    /// # Errors
    /// Returns [`RailbirdError::MatchNotFound`] for unknown ids.
    pub fn get_mut(&mut self, id: MatchId) -> Result<&mut Match> {
        self.matches
            .get_mut(&id)
            .ok_or(RailbirdError::MatchNotFound(id))
    }

    /// Lookup that timers use: a missing match is an expected race with
    /// cleanup, not an error.
    #[must_use]
    pub fn find_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.get_mut(&id)
    }

    /// Add a participant to a lobby match.
    ///
    /// # Errors
    /// - [`RailbirdError::MatchNotFound`] for unknown ids
    /// - [`RailbirdError::MatchClosed`] outside the lobby
    pub fn join(&mut self, id: MatchId, player: PlayerId, conn: ConnId) -> Result<()> {
        self.get_mut(id)?.join(player, conn)
    }

    /// Remove a participant, refund any pending stake, and retire the
    /// match if it is now empty.
    ///
    /// # Errors
    /// Returns [`RailbirdError::MatchNotFound`] for unknown ids.
    pub fn leave(
        &mut self,
        id: MatchId,
        player: &PlayerId,
        ledger: &mut Ledger,
    ) -> Result<LeaveOutcome> {
        let m = self.get_mut(id)?;
        let refunded = m.leave(player, ledger)?;
        let removed = m.is_empty();
        if removed {
            tracing::info!(%id, "last participant left, match removed");
            self.matches.remove(&id);
        }
        Ok(LeaveOutcome { refunded, removed })
    }

    /// Every match the player currently belongs to. The disconnect path
    /// uses this to treat a dropped connection as a leave everywhere.
    #[must_use]
    pub fn memberships(&self, player: &PlayerId) -> Vec<MatchId> {
        self.matches
            .iter()
            .filter(|(_, m)| m.players.contains_key(player))
            .map(|(id, _)| *id)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
