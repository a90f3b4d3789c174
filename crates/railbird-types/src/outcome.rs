//! Settlement output: the one-time record of a match's payouts.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Horse, MatchId, PlayerId};

/// One participant's settled position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerOutcome {
    /// Balance after settlement.
    pub balance: u64,
    /// Payout minus stake. Negative for a losing bet.
    pub net: i64,
    /// Whether the bet covered the winner.
    pub won: bool,
}

/// The single settlement record emitted for a finished match.
///
/// Produced exactly once per match, then broadcast as the final
/// `RaceResult` event and kept on the match for late queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub match_id: MatchId,
    pub winner: Horse,
    /// Per-horse pooled-odds multipliers, indexed by lane (horse 1 first).
    pub multipliers: Vec<Decimal>,
    /// Outcomes for every participant that held a bet at race end.
    pub outcomes: BTreeMap<PlayerId, PlayerOutcome>,
    pub settled_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        let mut outcomes = BTreeMap::new();
        outcomes.insert(
            PlayerId::new("alice"),
            PlayerOutcome {
                balance: 102,
                net: 2,
                won: true,
            },
        );
        let result = SettlementResult {
            match_id: MatchId::new(),
            winner: Horse(3),
            multipliers: vec![Decimal::new(5, 0); 5],
            outcomes,
            settled_at: Utc::now(),
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: SettlementResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result.winner, back.winner);
        assert_eq!(result.outcomes, back.outcomes);
        assert_eq!(result.multipliers, back.multipliers);
    }

    #[test]
    fn net_can_be_negative() {
        let outcome = PlayerOutcome {
            balance: 90,
            net: -10,
            won: false,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        let back: PlayerOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back.net, -10);
    }
}
