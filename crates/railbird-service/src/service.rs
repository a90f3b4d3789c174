//! The service actor and its client handle.

use std::collections::HashMap;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use railbird_engine::{MatchRegistry, RaceSimulator};
use railbird_ledger::Ledger;
use railbird_settlement::settle_race;
use railbird_types::{
    race_seed, BetSpec, ConnId, MatchId, MatchPhase, MatchView, PlayerId, Profile, RailbirdError,
    Result, ServerEvent, ServiceConfig,
};
use tokio::sync::{mpsc, oneshot};

use crate::auth::CredentialVerifier;
use crate::command::Command;
use crate::session::SessionRegistry;

/// The single owner of all mutable state, driven by one command queue.
pub struct RaceService {
    cfg: ServiceConfig,
    ledger: Ledger,
    registry: MatchRegistry,
    simulator: RaceSimulator,
    sessions: SessionRegistry,
    verifier: Box<dyn CredentialVerifier>,
    /// Per-race RNG, seeded from the match id at race start.
    race_rngs: HashMap<MatchId, StdRng>,
    /// Handle for timer tasks to re-queue internal commands.
    tx: mpsc::UnboundedSender<Command>,
    rx: mpsc::UnboundedReceiver<Command>,
}

impl RaceService {
    /// Spawn the service task and return the client handle.
    #[must_use]
    pub fn spawn(cfg: ServiceConfig, verifier: Box<dyn CredentialVerifier>) -> ServiceHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let service = Self {
            ledger: Ledger::new(cfg.starting_balance),
            registry: MatchRegistry::new(),
            simulator: RaceSimulator::new(cfg.race.clone()),
            sessions: SessionRegistry::new(),
            verifier,
            race_rngs: HashMap::new(),
            tx: tx.clone(),
            cfg,
            rx,
        };
        tokio::spawn(service.run());
        ServiceHandle { tx }
    }

    async fn run(mut self) {
        tracing::info!("service task started");
        while let Some(command) = self.rx.recv().await {
            // Each command runs to completion before the next is admitted —
            // no two mutations of the same match ever interleave.
            self.handle(command);
        }
        tracing::info!("service task stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Connect { conn, events } => {
                self.sessions.register(conn, events);
            }
            Command::Authenticate { conn, token, reply } => {
                let _ = reply.send(self.authenticate(conn, &token));
            }
            Command::CreateMatch { conn, reply } => {
                let _ = reply.send(self.create_match(conn));
            }
            Command::JoinMatch {
                conn,
                match_id,
                reply,
            } => {
                let _ = reply.send(self.join_match(conn, match_id));
            }
            Command::PlaceBet {
                conn,
                match_id,
                spec,
                reply,
            } => {
                let _ = reply.send(self.place_bet(conn, match_id, spec));
            }
            Command::SetReady {
                conn,
                match_id,
                reply,
            } => {
                let _ = reply.send(self.set_ready(conn, match_id));
            }
            Command::LeaveMatch { conn, match_id } => {
                if let Some(player) = self.sessions.player_of(conn) {
                    self.remove_from_match(match_id, &player);
                }
            }
            Command::Disconnect { conn } => {
                self.disconnect(conn);
            }
            Command::GetMatch { match_id, reply } => {
                let _ = reply.send(self.registry.get(match_id).map(|m| m.public_view()));
            }
            Command::CountdownTick {
                match_id,
                remaining,
            } => {
                self.countdown_tick(match_id, remaining);
            }
            Command::RaceStep { match_id } => {
                self.race_step(match_id);
            }
        }
    }

    // -----------------------------------------------------------------
    // Client operations
    // -----------------------------------------------------------------

    fn authenticate(&mut self, conn: ConnId, token: &str) -> Result<Profile> {
        let player = self.verifier.verify(token)?;
        self.sessions.bind_player(conn, player.clone())?;
        let profile = self.ledger.get_or_create(&player).clone();
        tracing::info!(%conn, %player, "authenticated");
        Ok(profile)
    }

    fn create_match(&mut self, conn: ConnId) -> Result<MatchId> {
        let player = self.sessions.require_player(conn)?;
        let id = self.registry.create(player, conn, self.cfg.race.horses);
        self.broadcast_match_update(id);
        Ok(id)
    }

    fn join_match(&mut self, conn: ConnId, id: MatchId) -> Result<MatchView> {
        let player = self.sessions.require_player(conn)?;
        self.registry.join(id, player, conn)?;
        let view = self.registry.get(id)?.public_view();
        self.broadcast_match_update(id);
        Ok(view)
    }

    fn place_bet(&mut self, conn: ConnId, id: MatchId, spec: BetSpec) -> Result<()> {
        let player = self.sessions.require_player(conn)?;
        let min_stake = self.cfg.min_stake;
        self.registry
            .get_mut(id)?
            .place_bet(&player, spec, &mut self.ledger, min_stake)?;
        self.broadcast_match_update(id);
        Ok(())
    }

    fn set_ready(&mut self, conn: ConnId, id: MatchId) -> Result<()> {
        let player = self.sessions.require_player(conn)?;
        let m = self.registry.get_mut(id)?;
        let all_ready = m.set_ready(&player)?;
        if all_ready {
            m.advance(MatchPhase::Countdown)?;
        }
        self.broadcast_match_update(id);
        if all_ready {
            self.schedule(
                self.cfg.countdown.interval,
                Command::CountdownTick {
                    match_id: id,
                    remaining: self.cfg.countdown.ticks,
                },
            );
        }
        Ok(())
    }

    /// Shared by explicit leave and disconnect cleanup.
    fn remove_from_match(&mut self, id: MatchId, player: &PlayerId) {
        match self.registry.leave(id, player, &mut self.ledger) {
            Ok(outcome) => {
                if outcome.removed {
                    self.race_rngs.remove(&id);
                } else {
                    self.broadcast_match_update(id);
                }
            }
            Err(err) => {
                // Leaving a match that is already gone is an expected race.
                tracing::debug!(%id, %err, "leave ignored");
            }
        }
    }

    fn disconnect(&mut self, conn: ConnId) {
        let Some(session) = self.sessions.unregister(conn) else {
            return;
        };
        let Some(player) = session.player else {
            return;
        };
        tracing::info!(%conn, %player, "disconnected");
        for id in self.registry.memberships(&player) {
            // Only the live handle counts: an old connection dropping must
            // not kick a player who has since rejoined.
            let is_current = self
                .registry
                .get(id)
                .ok()
                .and_then(|m| m.players.get(&player).map(|entry| entry.conn))
                == Some(conn);
            if is_current {
                self.remove_from_match(id, &player);
            }
        }
    }

    // -----------------------------------------------------------------
    // Timer-driven steps
    // -----------------------------------------------------------------

    fn countdown_tick(&mut self, id: MatchId, remaining: u8) {
        let Some(m) = self.registry.find_mut(id) else {
            tracing::debug!(%id, "countdown tick for retired match, ignoring");
            return;
        };
        if m.phase() != MatchPhase::Countdown {
            tracing::debug!(%id, phase = %m.phase(), "stale countdown tick, ignoring");
            return;
        }

        self.broadcast(
            id,
            ServerEvent::CountdownTick {
                seconds_remaining: remaining,
            },
        );
        if remaining == 0 {
            self.start_race(id);
        } else {
            self.schedule(
                self.cfg.countdown.interval,
                Command::CountdownTick {
                    match_id: id,
                    remaining: remaining - 1,
                },
            );
        }
    }

    fn start_race(&mut self, id: MatchId) {
        let mut rng = StdRng::seed_from_u64(race_seed(id, rand::random::<u64>()));
        let run = self.simulator.start(&mut rng);

        let Some(m) = self.registry.find_mut(id) else {
            return;
        };
        if let Err(err) = m.advance(MatchPhase::Running) {
            tracing::error!(%id, %err, "race start rejected");
            return;
        }
        m.race = Some(run);
        self.race_rngs.insert(id, rng);

        self.broadcast_match_update(id);
        self.schedule(
            self.cfg.race.frame_interval,
            Command::RaceStep { match_id: id },
        );
    }

    fn race_step(&mut self, id: MatchId) {
        let Some(m) = self.registry.find_mut(id) else {
            tracing::debug!(%id, "race step for retired match, ignoring");
            self.race_rngs.remove(&id);
            return;
        };
        if m.phase() != MatchPhase::Running {
            tracing::debug!(%id, phase = %m.phase(), "stale race step, ignoring");
            self.race_rngs.remove(&id);
            return;
        }
        let Some(run) = m.race.as_mut() else {
            return;
        };
        let Some(rng) = self.race_rngs.get_mut(&id) else {
            return;
        };

        let winner = self.simulator.step(run, rng);
        let frame = ServerEvent::RaceFrame {
            positions: run.positions.clone(),
        };
        self.broadcast(id, frame);

        if winner.is_some() {
            self.finish_race(id);
            self.race_rngs.remove(&id);
        } else {
            self.schedule(
                self.cfg.race.frame_interval,
                Command::RaceStep { match_id: id },
            );
        }
    }

    fn finish_race(&mut self, id: MatchId) {
        let Some(m) = self.registry.find_mut(id) else {
            return;
        };
        // Settlement reads the book at the moment the winner latched —
        // leavers were already neutralized.
        let bets = m.bets();
        let Some(run) = m.race.as_mut() else {
            return;
        };
        let result = match settle_race(id, run, &bets, &mut self.ledger) {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(%id, %err, "settlement rejected");
                return;
            }
        };
        if let Err(err) = m.finish(result.clone()) {
            tracing::error!(%id, %err, "finish rejected");
            return;
        }

        self.broadcast_match_update(id);
        self.broadcast(id, ServerEvent::RaceResult(result));

        if let Err(err) = self.ledger.verify_conservation() {
            tracing::error!(%id, %err, "post-settlement audit failed");
        }
    }

    // -----------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------

    /// Best-effort push to every current member of a match.
    fn broadcast(&self, id: MatchId, event: ServerEvent) {
        let Ok(m) = self.registry.get(id) else {
            return;
        };
        for entry in m.players.values() {
            self.sessions.send(entry.conn, event.clone());
        }
    }

    fn broadcast_match_update(&self, id: MatchId) {
        let Ok(m) = self.registry.get(id) else {
            return;
        };
        let event = ServerEvent::MatchUpdate(m.public_view());
        for entry in m.players.values() {
            self.sessions.send(entry.conn, event.clone());
        }
    }

    /// Re-queue `command` after `delay`. The sleep lives in its own task;
    /// the command re-enters the single-context queue like any other.
    fn schedule(&self, delay: Duration, command: Command) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(command);
        });
    }
}

/// Cheap, clonable client handle onto the service queue.
#[derive(Clone)]
pub struct ServiceHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl ServiceHandle {
    /// Open a connection: registers a session and returns its handle plus
    /// the server-push event stream.
    #[must_use]
    pub fn connect(&self) -> (ConnId, mpsc::UnboundedReceiver<ServerEvent>) {
        let conn = ConnId::new();
        let (events, rx) = mpsc::unbounded_channel();
        let _ = self.tx.send(Command::Connect { conn, events });
        (conn, rx)
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .map_err(|_| RailbirdError::Internal("service stopped".to_string()))?;
        rx.await
            .map_err(|_| RailbirdError::Internal("service dropped the reply".to_string()))?
    }

    pub async fn authenticate(&self, conn: ConnId, token: &str) -> Result<Profile> {
        let token = token.to_string();
        self.request(|reply| Command::Authenticate { conn, token, reply })
            .await
    }

    pub async fn create_match(&self, conn: ConnId) -> Result<MatchId> {
        self.request(|reply| Command::CreateMatch { conn, reply })
            .await
    }

    pub async fn join_match(&self, conn: ConnId, match_id: MatchId) -> Result<MatchView> {
        self.request(|reply| Command::JoinMatch {
            conn,
            match_id,
            reply,
        })
        .await
    }

    pub async fn place_bet(&self, conn: ConnId, match_id: MatchId, spec: BetSpec) -> Result<()> {
        self.request(|reply| Command::PlaceBet {
            conn,
            match_id,
            spec,
            reply,
        })
        .await
    }

    pub async fn set_ready(&self, conn: ConnId, match_id: MatchId) -> Result<()> {
        self.request(|reply| Command::SetReady {
            conn,
            match_id,
            reply,
        })
        .await
    }

    /// Leave a match. Fire-and-forget, no terminal reply.
    pub fn leave_match(&self, conn: ConnId, match_id: MatchId) {
        let _ = self.tx.send(Command::LeaveMatch { conn, match_id });
    }

    /// Report an abrupt connection loss. Treated exactly like an explicit
    /// leave for every match the identity belongs to.
    pub fn disconnect(&self, conn: ConnId) {
        let _ = self.tx.send(Command::Disconnect { conn });
    }

    /// Late query of a match's public view.
    pub async fn match_view(&self, match_id: MatchId) -> Result<MatchView> {
        self.request(|reply| Command::GetMatch { match_id, reply })
            .await
    }
}
