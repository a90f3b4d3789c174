//! # railbird-engine
//!
//! **Match plane**: match registry, lifecycle state machine, per-match bet
//! book, and the race simulator.
//!
//! ## Architecture
//!
//! The engine sits between the service layer and the ledger:
//! 1. **MatchRegistry**: sole owner of the id → [`Match`] mapping
//! 2. **Match**: participants, readiness, embedded bet book, and the
//!    forward-only LOBBY → COUNTDOWN → RUNNING → FINISHED phase machine
//! 3. **RaceSimulator**: stochastic stepping function that advances a
//!    [`RaceRun`](railbird_types::RaceRun) until exactly one horse crosses
//!    the finish line
//!
//! ## Mutation Flow
//!
//! ```text
//! service → registry.get_mut() → match.join/place_bet/set_ready
//!         → simulator.start/step → winner → settlement
//! ```
//!
//! Every mutation that touches money takes `&mut Ledger`, so stakes are
//! reserved and refunded in the same call that changes the book.

pub mod match_state;
pub mod registry;
pub mod simulator;

pub use match_state::{Match, ParticipantEntry};
pub use registry::{LeaveOutcome, MatchRegistry};
pub use simulator::RaceSimulator;
