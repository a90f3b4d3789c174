//! Wager model.
//!
//! A participant holds at most one pending [`Bet`] per match. The client
//! submits a [`BetSpec`]; validation turns it into a `Bet` whose `stake` is
//! the **total amount charged** — a split bet backs two horses and costs
//! double the submitted amount, and that doubling happens here, before the
//! bet is ever stored.

use serde::{Deserialize, Serialize};

use crate::{Horse, RailbirdError, Result};

/// Wager shape, as shown in sanitized public views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetKind {
    /// Backs one horse.
    Single,
    /// Backs two distinct horses, half the stake pooled on each.
    Split,
}

/// The horses a bet backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetSelection {
    Single(Horse),
    Split(Horse, Horse),
}

impl BetSelection {
    #[must_use]
    pub fn kind(self) -> BetKind {
        match self {
            Self::Single(_) => BetKind::Single,
            Self::Split(_, _) => BetKind::Split,
        }
    }

    /// Whether the selection includes the given horse.
    #[must_use]
    pub fn covers(self, horse: Horse) -> bool {
        match self {
            Self::Single(h) => h == horse,
            Self::Split(a, b) => a == horse || b == horse,
        }
    }

    /// The backed horses, lowest lane first for a split.
    #[must_use]
    pub fn horses(self) -> Vec<Horse> {
        match self {
            Self::Single(h) => vec![h],
            Self::Split(a, b) => {
                if a <= b {
                    vec![a, b]
                } else {
                    vec![b, a]
                }
            }
        }
    }
}

/// A client-submitted wager, before validation.
///
/// `amount` is what the player typed; for a split bet the total charge is
/// double this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetSpec {
    pub selection: BetSelection,
    pub amount: u64,
}

/// An accepted wager. `stake` is the full amount charged to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    pub selection: BetSelection,
    pub stake: u64,
}

impl Bet {
    /// Validate a [`BetSpec`] against the house rules.
    ///
    /// Checks, in order: stake at or above the configured minimum; every
    /// chosen horse inside `1..=horse_count`; split horses distinct. On
    /// success the returned bet's `stake` already reflects the total charge
    /// (doubled for splits).
    ///
    /// # Errors
    /// Returns [`RailbirdError::InvalidBet`] with the first failed check.
    pub fn from_spec(spec: BetSpec, min_stake: u64, horse_count: u8) -> Result<Self> {
        if spec.amount < min_stake {
            return Err(RailbirdError::InvalidBet {
                reason: format!("stake {} below minimum {min_stake}", spec.amount),
            });
        }

        for horse in spec.selection.horses() {
            if !horse.in_field(horse_count) {
                return Err(RailbirdError::InvalidBet {
                    reason: format!("{horse} outside field 1..={horse_count}"),
                });
            }
        }

        let stake = match spec.selection {
            BetSelection::Single(_) => spec.amount,
            BetSelection::Split(a, b) => {
                if a == b {
                    return Err(RailbirdError::InvalidBet {
                        reason: "split bet must back two distinct horses".to_string(),
                    });
                }
                // Two horses, double the charge.
                spec.amount
                    .checked_mul(2)
                    .ok_or_else(|| RailbirdError::InvalidBet {
                        reason: format!("stake {} too large", spec.amount),
                    })?
            }
        };

        Ok(Self {
            selection: spec.selection,
            stake,
        })
    }

    #[must_use]
    pub fn kind(&self) -> BetKind {
        self.selection.kind()
    }

    /// Whether this bet pays out when `winner` takes the race.
    #[must_use]
    pub fn covers(&self, winner: Horse) -> bool {
        self.selection.covers(winner)
    }
}
