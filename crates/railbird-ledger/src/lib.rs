//! # railbird-ledger
//!
//! The authoritative store of every identity's balance and historical
//! win/loss record.
//!
//! ## Architecture
//!
//! The ledger is owned by the single service context and shared across all
//! concurrently active matches:
//! 1. **Ledger**: per-player profiles with atomic check-and-debit
//! 2. **Conservation**: mint/burn audit — the sum of all balances must
//!    always equal everything granted and paid out minus everything staked
//!
//! ## Money Flow
//!
//! ```text
//! authenticate → get_or_create (starting grant, mint)
//! place bet    → reserve (check-and-debit, burn)
//! win          → credit (payout, mint) + record_outcome
//! lose         → record_outcome only (stake was taken at reserve)
//! ```
//!
//! A bet's full stake is charged up front at acceptance; settlement only
//! ever credits back. That is what makes the same balance unable to fund
//! two simultaneous bets in two matches.

pub mod conservation;
pub mod ledger;

pub use conservation::Conservation;
pub use ledger::Ledger;
