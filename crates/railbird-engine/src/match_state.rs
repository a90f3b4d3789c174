//! One match: participants, embedded bet book, and the phase machine.
//!
//! The phase field is private — it only moves through [`Match::advance`],
//! which permits single forward steps and nothing else. Money never moves
//! except through the `&mut Ledger` passed into the mutating calls, so a
//! failed validation leaves both the book and the ledger untouched.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use railbird_ledger::Ledger;
use railbird_types::{
    Bet, BetSpec, BetView, ConnId, MatchId, MatchPhase, MatchView, PlayerId, PlayerView, RaceRun,
    RailbirdError, Result, SettlementResult,
};

/// One participant's in-match state.
#[derive(Debug, Clone)]
pub struct ParticipantEntry {
    /// Current connection handle. Refreshed on rejoin.
    pub conn: ConnId,
    /// Readiness flag for the countdown trigger.
    pub ready: bool,
    /// At most one pending bet; its stake is already reserved.
    pub bet: Option<Bet>,
}

impl ParticipantEntry {
    fn new(conn: ConnId) -> Self {
        Self {
            conn,
            ready: false,
            bet: None,
        }
    }
}

/// One multiplayer betting/race session.
#[derive(Debug)]
pub struct Match {
    pub id: MatchId,
    pub host: PlayerId,
    phase: MatchPhase,
    pub players: BTreeMap<PlayerId, ParticipantEntry>,
    /// Per-horse historical win counts, display only.
    pub leaderboard: Vec<u32>,
    /// Present from the RUNNING transition onwards.
    pub race: Option<RaceRun>,
    /// Present once settled; kept for late result queries.
    pub result: Option<SettlementResult>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Create a lobby match with the host as sole participant.
    #[must_use]
    pub fn new(id: MatchId, host: PlayerId, conn: ConnId, horses: u8) -> Self {
        let mut players = BTreeMap::new();
        players.insert(host.clone(), ParticipantEntry::new(conn));
        Self {
            id,
            host,
            phase: MatchPhase::Lobby,
            players,
            leaderboard: vec![0; usize::from(horses)],
            race: None,
            result: None,
            created_at: Utc::now(),
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Number of contestants in this match's races.
    #[must_use]
    pub fn horse_count(&self) -> u8 {
        self.leaderboard.len() as u8
    }

    /// Advance the phase by exactly one forward step.
    ///
    /// # Errors
    /// Returns [`RailbirdError::PhaseRegression`] for anything but the
    /// single legal successor — a tripped guard here is a programming
    /// defect, not an expected runtime condition.
    pub fn advance(&mut self, next: MatchPhase) -> Result<()> {
        if !self.phase.can_advance_to(next) {
            return Err(RailbirdError::PhaseRegression {
                from: self.phase,
                to: next,
            });
        }
        tracing::info!(id = %self.id, from = %self.phase, to = %next, "phase transition");
        self.phase = next;
        Ok(())
    }

    /// Add a participant, or refresh the connection handle of an existing
    /// one (rejoin keeps readiness and any reserved bet).
    ///
    /// # Errors
    /// Returns [`RailbirdError::MatchClosed`] outside the lobby.
    pub fn join(&mut self, player: PlayerId, conn: ConnId) -> Result<()> {
        if let Some(entry) = self.players.get_mut(&player) {
            // Rejoin: a reconnect must not destroy a reserved stake.
            entry.conn = conn;
            return Ok(());
        }
        if !self.phase.accepts_joins() {
            return Err(RailbirdError::MatchClosed { phase: self.phase });
        }
        self.players.insert(player, ParticipantEntry::new(conn));
        Ok(())
    }

    /// Remove a participant and neutralize any pending bet.
    ///
    /// An unsettled stake is credited back, so a leaver is net not-debited.
    /// Once the match is FINISHED the bet has already been settled and
    /// nothing is refunded. Leaving a match one is not in is a silent
    /// no-op (the disconnect path scans every match).
    ///
    /// Returns the refunded amount.
    pub fn leave(&mut self, player: &PlayerId, ledger: &mut Ledger) -> Result<u64> {
        let Some(entry) = self.players.remove(player) else {
            return Ok(0);
        };

        let mut refunded = 0;
        if !self.phase.is_terminal() {
            if let Some(bet) = entry.bet {
                ledger.credit(player, bet.stake)?;
                refunded = bet.stake;
                tracing::debug!(id = %self.id, %player, refunded, "pending bet neutralized");
            }
        }
        Ok(refunded)
    }

    /// Accept or replace the participant's pending bet.
    ///
    /// Validates the wager, refunds a previously reserved stake, then
    /// atomically check-and-debits the new one. On any failure both the
    /// book and the ledger are left exactly as they were.
    ///
    /// # Errors
    /// - [`RailbirdError::BettingClosed`] outside the lobby
    /// - [`RailbirdError::NotInMatch`] for non-participants
    /// - [`RailbirdError::InvalidBet`] on stake/selection validation
    /// - [`RailbirdError::InsufficientFunds`] when the balance (plus the
    ///   refund of the replaced bet) cannot cover the total charge
    pub fn place_bet(
        &mut self,
        player: &PlayerId,
        spec: BetSpec,
        ledger: &mut Ledger,
        min_stake: u64,
    ) -> Result<()> {
        if !self.phase.accepts_bets() {
            return Err(RailbirdError::BettingClosed { phase: self.phase });
        }
        let horse_count = self.horse_count();
        let entry = self
            .players
            .get_mut(player)
            .ok_or_else(|| RailbirdError::NotInMatch {
                match_id: self.id,
                player: player.clone(),
            })?;

        let bet = Bet::from_spec(spec, min_stake, horse_count)?;

        // Replacing a bet frees its stake first; on failure the prior bet
        // is re-reserved, which cannot fail because we just credited it.
        let prior = entry.bet.take();
        if let Some(prior_bet) = &prior {
            ledger.credit(player, prior_bet.stake)?;
        }
        match ledger.reserve(player, bet.stake) {
            Ok(()) => {
                tracing::debug!(id = %self.id, %player, stake = bet.stake, "bet accepted");
                self.players
                    .get_mut(player)
                    .ok_or_else(|| RailbirdError::Internal("entry vanished mid-bet".into()))?
                    .bet = Some(bet);
                Ok(())
            }
            Err(err) => {
                if let Some(prior_bet) = prior {
                    ledger.reserve(player, prior_bet.stake)?;
                    self.players
                        .get_mut(player)
                        .ok_or_else(|| RailbirdError::Internal("entry vanished mid-bet".into()))?
                        .bet = Some(prior_bet);
                }
                Err(err)
            }
        }
    }

    /// Mark the participant ready. Returns whether every current
    /// participant is now ready (the countdown trigger).
    ///
    /// # Errors
    /// - [`RailbirdError::MatchClosed`] outside the lobby
    /// - [`RailbirdError::NotInMatch`] for non-participants
    pub fn set_ready(&mut self, player: &PlayerId) -> Result<bool> {
        if !self.phase.accepts_bets() {
            return Err(RailbirdError::MatchClosed { phase: self.phase });
        }
        let entry = self
            .players
            .get_mut(player)
            .ok_or_else(|| RailbirdError::NotInMatch {
                match_id: self.id,
                player: player.clone(),
            })?;
        entry.ready = true;
        Ok(self.all_ready())
    }

    /// Whether every current participant has signaled readiness.
    /// An empty match is never "all ready".
    #[must_use]
    pub fn all_ready(&self) -> bool {
        !self.players.is_empty() && self.players.values().all(|p| p.ready)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Snapshot of the bet book: every participant with a pending bet.
    /// Settlement reads this at the moment the winner is latched.
    #[must_use]
    pub fn bets(&self) -> Vec<(PlayerId, Bet)> {
        self.players
            .iter()
            .filter_map(|(player, entry)| entry.bet.map(|bet| (player.clone(), bet)))
            .collect()
    }

    /// Record the settlement: bump the winner's leaderboard entry, store
    /// the result for late queries, and advance to FINISHED.
    ///
    /// # Errors
    /// Returns [`RailbirdError::PhaseRegression`] unless RUNNING.
    pub fn finish(&mut self, result: SettlementResult) -> Result<()> {
        self.advance(MatchPhase::Finished)?;
        if let Some(count) = self.leaderboard.get_mut(result.winner.index()) {
            *count += 1;
        }
        self.result = Some(result);
        Ok(())
    }

    /// Sanitized public snapshot: readiness and bet kind/amount only —
    /// chosen horses stay sealed.
    #[must_use]
    pub fn public_view(&self) -> MatchView {
        MatchView {
            id: self.id,
            host: self.host.clone(),
            phase: self.phase,
            players: self
                .players
                .iter()
                .map(|(player, entry)| {
                    (
                        player.clone(),
                        PlayerView {
                            ready: entry.ready,
                            bet: entry.bet.as_ref().map(BetView::from),
                        },
                    )
                })
                .collect(),
            leaderboard: self.leaderboard.clone(),
            winner: self.race.as_ref().and_then(|r| r.winner),
        }
    }
}
