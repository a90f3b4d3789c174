//! Match lifecycle phases.
//!
//! A match moves strictly forward through
//! **LOBBY → COUNTDOWN → RUNNING → FINISHED** and never regresses.
//! FINISHED is terminal: the match stays addressable for late result
//! queries but accepts no further bets, joins, or readiness signals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four phases of a match lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Gathering participants, accepting bets and readiness signals.
    Lobby,
    /// All participants ready; ticking down to the race start.
    Countdown,
    /// The race simulation is advancing; no mutations except frames.
    Running,
    /// Winner latched and payouts settled. Terminal.
    Finished,
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "LOBBY"),
            Self::Countdown => write!(f, "COUNTDOWN"),
            Self::Running => write!(f, "RUNNING"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

impl MatchPhase {
    /// The next phase in the forward-only lifecycle, or `None` from the
    /// terminal phase.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Lobby => Some(Self::Countdown),
            Self::Countdown => Some(Self::Running),
            Self::Running => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    /// Can this phase legally advance to `target`? Only single forward
    /// steps are allowed — phases are never skipped or revisited.
    #[must_use]
    pub fn can_advance_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Whether new participants may still join.
    #[must_use]
    pub fn accepts_joins(self) -> bool {
        self == Self::Lobby
    }

    /// Whether bets and readiness signals are still accepted.
    #[must_use]
    pub fn accepts_bets(self) -> bool {
        self == Self::Lobby
    }

    /// Whether this phase is terminal.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_order_is_linear() {
        assert_eq!(MatchPhase::Lobby.next(), Some(MatchPhase::Countdown));
        assert_eq!(MatchPhase::Countdown.next(), Some(MatchPhase::Running));
        assert_eq!(MatchPhase::Running.next(), Some(MatchPhase::Finished));
        assert_eq!(MatchPhase::Finished.next(), None);
    }

    #[test]
    fn no_backwards_transitions() {
        assert!(!MatchPhase::Countdown.can_advance_to(MatchPhase::Lobby));
        assert!(!MatchPhase::Running.can_advance_to(MatchPhase::Countdown));
        assert!(!MatchPhase::Finished.can_advance_to(MatchPhase::Running));
    }

    #[test]
    fn no_phase_skipping() {
        assert!(!MatchPhase::Lobby.can_advance_to(MatchPhase::Running));
        assert!(!MatchPhase::Lobby.can_advance_to(MatchPhase::Finished));
        assert!(!MatchPhase::Countdown.can_advance_to(MatchPhase::Finished));
    }

    #[test]
    fn only_lobby_accepts_joins_and_bets() {
        assert!(MatchPhase::Lobby.accepts_joins());
        assert!(MatchPhase::Lobby.accepts_bets());
        for phase in [
            MatchPhase::Countdown,
            MatchPhase::Running,
            MatchPhase::Finished,
        ] {
            assert!(!phase.accepts_joins(), "{phase} must reject joins");
            assert!(!phase.accepts_bets(), "{phase} must reject bets");
        }
    }

    #[test]
    fn phase_display() {
        assert_eq!(format!("{}", MatchPhase::Lobby), "LOBBY");
        assert_eq!(format!("{}", MatchPhase::Countdown), "COUNTDOWN");
        assert_eq!(format!("{}", MatchPhase::Running), "RUNNING");
        assert_eq!(format!("{}", MatchPhase::Finished), "FINISHED");
    }

    #[test]
    fn phase_serde_roundtrip() {
        let phase = MatchPhase::Countdown;
        let json = serde_json::to_string(&phase).unwrap();
        let back: MatchPhase = serde_json::from_str(&json).unwrap();
        assert_eq!(phase, back);
    }
}
