//! # railbird-settlement
//!
//! **Finality plane**: pooled-odds computation and the exactly-once
//! application of a race outcome to every participant's balance.
//!
//! ## Flow
//!
//! The settler receives the winner-latched [`RaceRun`](railbird_types::RaceRun)
//! and a snapshot of the bet book, then:
//! 1. Flips the run's single-use settlement latch (no double-settlement)
//! 2. Builds the per-horse [`OddsTable`] from the pooled stakes
//! 3. Credits `round(stake × multiplier(winner))` to every covering bet
//!    (stakes were already debited at acceptance)
//! 4. Records a win or loss on every bettor's profile
//! 5. Emits one [`SettlementResult`](railbird_types::SettlementResult)
//!
//! All fractional arithmetic happens in [`rust_decimal`] — the multiplier
//! table and payout rounding are exact, never floating-point.

pub mod odds;
pub mod settle;

pub use odds::OddsTable;
pub use settle::settle_race;
