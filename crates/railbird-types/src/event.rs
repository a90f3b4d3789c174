//! Server-pushed events.
//!
//! Every mutation handler broadcasts its resulting event **before** it
//! returns, so events for one match arrive in mutation order.

use serde::{Deserialize, Serialize};

use crate::{MatchView, SettlementResult};

/// Events pushed to every connected member of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerEvent {
    /// Sanitized match state after any membership/bet/readiness change.
    MatchUpdate(MatchView),
    /// One countdown tick; `0` means the race starts now.
    CountdownTick { seconds_remaining: u8 },
    /// Live per-horse positions for one simulation step.
    RaceFrame { positions: Vec<f64> },
    /// The final settlement record. Sent once, after which the match is
    /// FINISHED.
    RaceResult(SettlementResult),
}
