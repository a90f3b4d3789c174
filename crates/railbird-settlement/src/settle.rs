//! Exactly-once race settlement.
//!
//! Ordering mirrors the rest of the money path: the idempotency latch
//! flips **first**, so a duplicate race-end signal cannot re-enter the
//! payout loop no matter where the first invocation is interrupted.

use std::collections::BTreeMap;

use chrono::Utc;
use railbird_ledger::Ledger;
use railbird_types::{
    Bet, MatchId, PlayerId, PlayerOutcome, RaceRun, RailbirdError, Result, SettlementResult,
};

use crate::odds::OddsTable;

/// Apply the race outcome to every pending bet, exactly once per run.
///
/// `bets` is the book as read at the moment the winner latched; stakes in
/// it were already debited when the bets were accepted, so winners are
/// credited `round(stake × multiplier(winner))` and losers only have the
/// loss recorded.
///
/// # Errors
/// - [`RailbirdError::RaceNotFinished`] if no winner is latched yet
/// - [`RailbirdError::AlreadySettled`] on re-invocation; the ledger is
///   untouched in that case
pub fn settle_race(
    match_id: MatchId,
    run: &mut RaceRun,
    bets: &[(PlayerId, Bet)],
    ledger: &mut Ledger,
) -> Result<SettlementResult> {
    let winner = run
        .winner
        .ok_or(RailbirdError::RaceNotFinished(match_id))?;

    // Single-use latch: everything below runs at most once per run.
    if !run.latch_settled() {
        return Err(RailbirdError::AlreadySettled(match_id));
    }

    let horse_count = run.horse_count() as u8;
    let odds = OddsTable::from_bets(bets.iter().map(|(_, bet)| bet), horse_count);

    let mut outcomes = BTreeMap::new();
    for (player, bet) in bets {
        let won = bet.covers(winner);
        let payout = if won { odds.payout(bet.stake, winner) } else { 0 };
        if payout > 0 {
            ledger.credit(player, payout)?;
        }
        ledger.record_outcome(player, won)?;

        outcomes.insert(
            player.clone(),
            PlayerOutcome {
                balance: ledger.balance(player),
                net: payout as i64 - bet.stake as i64,
                won,
            },
        );
    }

    tracing::info!(%match_id, %winner, bettors = bets.len(), "settled");
    Ok(SettlementResult {
        match_id,
        winner,
        multipliers: odds.multipliers().to_vec(),
        outcomes,
        settled_at: Utc::now(),
    })
}
