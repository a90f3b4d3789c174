//! Pooled-odds table.
//!
//! Each horse's pool is the stake attributed to it across all pending
//! bets: a single bet contributes its full stake, a split bet half its
//! stake to each chosen horse. The payout multiplier is
//! `(total + 5) / (pool + 1)` — the fixed offsets keep the formula finite
//! when a horse has no backers and bounded when the pool is tiny.

use railbird_types::{constants, Bet, BetSelection, Horse};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Per-horse pooled stakes and payout multipliers for one match.
#[derive(Debug, Clone, PartialEq)]
pub struct OddsTable {
    pools: Vec<Decimal>,
    total: Decimal,
    multipliers: Vec<Decimal>,
}

impl OddsTable {
    /// Build the table from every pending bet.
    #[must_use]
    pub fn from_bets<'a, I>(bets: I, horse_count: u8) -> Self
    where
        I: IntoIterator<Item = &'a Bet>,
    {
        let mut pools = vec![Decimal::ZERO; usize::from(horse_count)];
        for bet in bets {
            match bet.selection {
                BetSelection::Single(h) => {
                    if let Some(pool) = pools.get_mut(h.index()) {
                        *pool += Decimal::from(bet.stake);
                    }
                }
                BetSelection::Split(a, b) => {
                    let half = Decimal::from(bet.stake) / Decimal::TWO;
                    if let Some(pool) = pools.get_mut(a.index()) {
                        *pool += half;
                    }
                    if let Some(pool) = pools.get_mut(b.index()) {
                        *pool += half;
                    }
                }
            }
        }

        let total: Decimal = pools.iter().copied().sum();
        let total_offset = Decimal::from(constants::POOL_TOTAL_OFFSET);
        let horse_offset = Decimal::from(constants::POOL_HORSE_OFFSET);
        let multipliers = pools
            .iter()
            .map(|pool| (total + total_offset) / (pool + horse_offset))
            .collect();

        Self {
            pools,
            total,
            multipliers,
        }
    }

    /// Stake pooled on one horse.
    #[must_use]
    pub fn pool(&self, horse: Horse) -> Decimal {
        self.pools.get(horse.index()).copied().unwrap_or(Decimal::ZERO)
    }

    /// Sum of all pools.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Payout multiplier for one horse.
    #[must_use]
    pub fn multiplier(&self, horse: Horse) -> Decimal {
        self.multipliers
            .get(horse.index())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// The full multiplier table, indexed by lane.
    #[must_use]
    pub fn multipliers(&self) -> &[Decimal] {
        &self.multipliers
    }

    /// Payout for a covering bet: `round(stake × multiplier(winner))`,
    /// midpoint rounding away from zero. Saturates at `u64::MAX`, which is
    /// unreachable for any stake the ledger can actually hold.
    #[must_use]
    pub fn payout(&self, stake: u64, winner: Horse) -> u64 {
        (Decimal::from(stake) * self.multiplier(winner))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .unwrap_or(u64::MAX)
    }
}
