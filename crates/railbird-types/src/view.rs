//! Sanitized public views of match state.
//!
//! A [`MatchView`] is what every participant receives after each mutation.
//! While the match is still in the lobby it preserves the sealed-bid
//! property: other participants see that a bet exists and for how much,
//! but never **which horses** it backs — [`BetView`] carries only the kind
//! and the amount.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Bet, BetKind, Horse, MatchId, MatchPhase, PlayerId};

/// What other participants may know about a pending bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetView {
    pub kind: BetKind,
    /// The total charged stake.
    pub amount: u64,
}

impl From<&Bet> for BetView {
    fn from(bet: &Bet) -> Self {
        Self {
            kind: bet.kind(),
            amount: bet.stake,
        }
    }
}

/// One participant's public state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub ready: bool,
    pub bet: Option<BetView>,
}

/// Broadcast snapshot of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub id: MatchId,
    pub host: PlayerId,
    pub phase: MatchPhase,
    pub players: BTreeMap<PlayerId, PlayerView>,
    /// Per-horse historical win counts, display only.
    pub leaderboard: Vec<u32>,
    /// Set once the race has finished.
    pub winner: Option<Horse>,
}
