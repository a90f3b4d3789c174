//! Error types for the Railbird engine.
//!
//! All errors use the `RB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Authentication errors
//! - 2xx: Ledger / balance errors
//! - 3xx: Match lifecycle errors
//! - 4xx: Bet errors
//! - 5xx: Race errors
//! - 6xx: Settlement errors
//! - 9xx: General / internal errors
//!
//! Every variant here is a recoverable, client-facing condition except the
//! structural guards (`PhaseRegression`, `AlreadySettled`), which exist to
//! turn programming defects into loud errors instead of corrupted money.

use thiserror::Error;

use crate::{MatchId, MatchPhase, PlayerId};

/// Central error enum for all Railbird operations.
#[derive(Debug, Error)]
pub enum RailbirdError {
    // =================================================================
    // Authentication Errors (1xx)
    // =================================================================
    /// The credential token was missing, malformed, or failed verification.
    #[error("RB_ERR_100: Unauthenticated: {reason}")]
    Unauthenticated { reason: String },

    // =================================================================
    // Ledger / Balance Errors (2xx)
    // =================================================================
    /// Not enough balance to cover the requested stake.
    #[error("RB_ERR_200: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// A credit would overflow the balance counter.
    #[error("RB_ERR_201: Balance overflow for {0}")]
    BalanceOverflow(PlayerId),

    /// The player has no ledger profile.
    #[error("RB_ERR_202: Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    // =================================================================
    // Match Lifecycle Errors (3xx)
    // =================================================================
    /// The requested match does not exist (or has been retired).
    #[error("RB_ERR_300: Match not found: {0}")]
    MatchNotFound(MatchId),

    /// The operation is not legal in the match's current phase.
    #[error("RB_ERR_301: Match closed in phase {phase}")]
    MatchClosed { phase: MatchPhase },

    /// The player is not a participant of the match.
    #[error("RB_ERR_302: {player} is not in match {match_id}")]
    NotInMatch { match_id: MatchId, player: PlayerId },

    /// Attempted to move a match backwards or skip a phase.
    #[error("RB_ERR_303: Illegal phase transition {from} -> {to}")]
    PhaseRegression { from: MatchPhase, to: MatchPhase },

    // =================================================================
    // Bet Errors (4xx)
    // =================================================================
    /// Bets are only accepted while the match is in the lobby.
    #[error("RB_ERR_400: Betting closed in phase {phase}")]
    BettingClosed { phase: MatchPhase },

    /// The bet failed validation (stake or horse selection).
    #[error("RB_ERR_401: Invalid bet: {reason}")]
    InvalidBet { reason: String },

    // =================================================================
    // Race Errors (5xx)
    // =================================================================
    /// A race operation was attempted before the race started.
    #[error("RB_ERR_500: Race not started for match {0}")]
    RaceNotStarted(MatchId),

    /// Settlement was requested before a winner was latched.
    #[error("RB_ERR_501: Race not finished for match {0}")]
    RaceNotFinished(MatchId),

    // =================================================================
    // Settlement Errors (6xx)
    // =================================================================
    /// The match has already been settled (single-use latch tripped).
    #[error("RB_ERR_600: Match already settled: {0}")]
    AlreadySettled(MatchId),

    /// Money conservation broke — critical safety alert.
    #[error("RB_ERR_601: Conservation violation: {reason}")]
    ConservationViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("RB_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, RailbirdError>;
