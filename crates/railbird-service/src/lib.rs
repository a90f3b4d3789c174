//! # railbird-service
//!
//! The single event-processing context that owns every mutable piece of the
//! system: the ledger, the match registry, the live sessions, and the race
//! RNGs.
//!
//! ## Concurrency model
//!
//! One tokio task consumes a [`Command`] queue. Each command — a client
//! request, a countdown tick, a race step — runs to completion without
//! awaiting, so no two mutations of the same match ever interleave. Timers
//! are not callbacks: they are sleeps that re-queue an internal command,
//! and every firing re-validates that its match still exists and is still
//! in the right phase. A timer racing a cleanup is a silent no-op.
//!
//! ## Request / reply
//!
//! Every client operation carries a oneshot reply channel and gets exactly
//! one terminal `Result`. Server-pushed [`ServerEvent`]s flow through each
//! session's unbounded channel, sent before the mutating handler returns so
//! per-match ordering follows mutation ordering.
//!
//! [`ServerEvent`]: railbird_types::ServerEvent

pub mod auth;
pub mod command;
pub mod service;
pub mod session;

pub use auth::{CredentialVerifier, Ed25519Verifier};
pub use command::Command;
pub use service::{RaceService, ServiceHandle};
pub use session::SessionRegistry;
