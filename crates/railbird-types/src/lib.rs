//! # railbird-types
//!
//! Shared types, errors, and configuration for the **Railbird** race-betting
//! session engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`MatchId`], [`ConnId`], [`PlayerId`], [`Horse`]
//! - **Bet model**: [`Bet`], [`BetSpec`], [`BetSelection`], [`BetKind`]
//! - **Race model**: [`RaceRun`], [`race_seed`]
//! - **Lifecycle**: [`MatchPhase`]
//! - **Profile model**: [`Profile`]
//! - **Public views**: [`MatchView`], [`PlayerView`], [`BetView`]
//! - **Settlement output**: [`SettlementResult`], [`PlayerOutcome`]
//! - **Server push**: [`ServerEvent`]
//! - **Configuration**: [`ServiceConfig`], [`RaceConfig`], [`CountdownConfig`]
//! - **Errors**: [`RailbirdError`] with `RB_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod bet;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod outcome;
pub mod phase;
pub mod profile;
pub mod race;
pub mod view;

// Re-export all primary types at crate root for ergonomic imports:
//   use railbird_types::{Bet, MatchPhase, RaceRun, ServerEvent, ...};

pub use bet::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use outcome::*;
pub use phase::*;
pub use profile::*;
pub use race::*;
pub use view::*;

// Constants are accessed via `railbird_types::constants::FOO`
// (not re-exported to avoid name collisions).
