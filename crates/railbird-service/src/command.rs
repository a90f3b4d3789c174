//! The command queue alphabet.
//!
//! Client-originated commands carry a oneshot reply channel and get
//! exactly one terminal `Result`. `LeaveMatch` and `Disconnect` carry no
//! reply channel. The timer commands are internal: they are re-queued by
//! the scheduler and never cross the client boundary.

use railbird_types::{BetSpec, ConnId, MatchId, MatchView, Profile, Result, ServerEvent};
use tokio::sync::{mpsc, oneshot};

/// Everything the service task knows how to process.
#[derive(Debug)]
pub enum Command {
    /// Register a fresh connection and its server-push channel.
    Connect {
        conn: ConnId,
        events: mpsc::UnboundedSender<ServerEvent>,
    },
    /// Verify a credential token and bind the identity to the connection.
    Authenticate {
        conn: ConnId,
        token: String,
        reply: oneshot::Sender<Result<Profile>>,
    },
    /// Create a match with the caller as host and sole participant.
    CreateMatch {
        conn: ConnId,
        reply: oneshot::Sender<Result<MatchId>>,
    },
    /// Join a lobby match.
    JoinMatch {
        conn: ConnId,
        match_id: MatchId,
        reply: oneshot::Sender<Result<MatchView>>,
    },
    /// Place (or replace) the caller's pending bet.
    PlaceBet {
        conn: ConnId,
        match_id: MatchId,
        spec: BetSpec,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Signal readiness; may trigger the countdown.
    SetReady {
        conn: ConnId,
        match_id: MatchId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Leave a match. No reply.
    LeaveMatch { conn: ConnId, match_id: MatchId },
    /// Connection lost: leave every match the identity belongs to. No reply.
    Disconnect { conn: ConnId },
    /// Late query of a match's public view (including a stored result).
    GetMatch {
        match_id: MatchId,
        reply: oneshot::Sender<Result<MatchView>>,
    },
    /// Internal: one countdown tick. Re-validates the match before acting.
    CountdownTick { match_id: MatchId, remaining: u8 },
    /// Internal: one race simulation step. Re-validates the match.
    RaceStep { match_id: MatchId },
}
