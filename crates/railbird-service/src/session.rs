//! Live connection registry.
//!
//! Maps every connection handle to its server-push channel and, once
//! authenticated, its player identity. Sends are best-effort: a session
//! whose receiver is gone simply stops getting events until the disconnect
//! command catches up with it.

use std::collections::HashMap;

use railbird_types::{ConnId, PlayerId, RailbirdError, Result, ServerEvent};
use tokio::sync::mpsc;

/// One live connection.
#[derive(Debug)]
pub struct Session {
    /// Set by a successful `authenticate`.
    pub player: Option<PlayerId>,
    /// Server-push channel for this connection.
    pub events: mpsc::UnboundedSender<ServerEvent>,
}

/// All live connections.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<ConnId, Session>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh, unauthenticated connection.
    pub fn register(&mut self, conn: ConnId, events: mpsc::UnboundedSender<ServerEvent>) {
        self.sessions.insert(
            conn,
            Session {
                player: None,
                events,
            },
        );
    }

    /// Drop a connection, returning its session for disconnect cleanup.
    pub fn unregister(&mut self, conn: ConnId) -> Option<Session> {
        self.sessions.remove(&conn)
    }

    /// Bind an authenticated identity to a connection.
    ///
    /// # Errors
    /// Returns [`RailbirdError::Unauthenticated`] for an unknown connection.
    pub fn bind_player(&mut self, conn: ConnId, player: PlayerId) -> Result<()> {
        let session = self
            .sessions
            .get_mut(&conn)
            .ok_or_else(|| RailbirdError::Unauthenticated {
                reason: format!("unknown connection {conn}"),
            })?;
        session.player = Some(player);
        Ok(())
    }

    /// The authenticated identity of a connection, if any.
    #[must_use]
    pub fn player_of(&self, conn: ConnId) -> Option<PlayerId> {
        self.sessions.get(&conn).and_then(|s| s.player.clone())
    }

    /// The authenticated identity, or `Unauthenticated`.
    pub fn require_player(&self, conn: ConnId) -> Result<PlayerId> {
        self.player_of(conn)
            .ok_or_else(|| RailbirdError::Unauthenticated {
                reason: "no authenticated session".to_string(),
            })
    }

    /// Best-effort push to one connection.
    pub fn send(&self, conn: ConnId, event: ServerEvent) {
        if let Some(session) = self.sessions.get(&conn) {
            let _ = session.events.send(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
