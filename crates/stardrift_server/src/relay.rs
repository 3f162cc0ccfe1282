//! Relay state machine
//!
//! The server is a passive broadcaster: it holds the connected player
//! map, assigns identities, and fans whatever state clients report back
//! out to every connection. It never simulates asteroids.
//!
//! Per-player lifecycle: `Connecting -> Lobby(not ready) -> Lobby(ready)
//! -> InGame -> {Eliminated | SessionEnded}`. The session auto-starts
//! once at least two players are connected and all of them are ready;
//! a disconnect that drops readiness below that threshold reverts the
//! session to not-started.
//!
//! Outbound delivery is best-effort through per-connection channels; a
//! closed channel drops the message with a logged warning, no retry.

use std::collections::HashMap;

use stardrift_core::net::protocol::{ClientMessage, PlayerSnapshot, ServerMessage, WireVec3};
use stardrift_core::player::{PlayerId, MAX_HEALTH};
use tokio::sync::mpsc::UnboundedSender;

/// Minimum connected-and-ready players for an auto-start
pub const MIN_PLAYERS: usize = 2;

/// Seconds counted down before a session starts
pub const COUNTDOWN_SECS: u32 = 3;

/// Side effect the socket layer must drive after a `handle` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayCommand {
    /// Run the pre-start countdown, then call [`Relay::confirm_start`]
    BeginCountdown {
        /// Tag for this countdown; a lobby change invalidates it, so a
        /// countdown task that outlives its lobby completes as a no-op
        generation: u64,
    },
}

/// Shared relay state for one server process (one session at a time)
pub struct Relay {
    players: HashMap<PlayerId, PlayerSnapshot>,
    outboxes: HashMap<PlayerId, UnboundedSender<ServerMessage>>,
    next_id: u32,
    game_started: bool,
    countdown_running: bool,
    countdown_generation: u64,
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}

impl Relay {
    /// Create an empty relay
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
            outboxes: HashMap::new(),
            next_id: 1,
            game_started: false,
            countdown_running: false,
            countdown_generation: 0,
        }
    }

    /// Whether a session is in progress
    pub fn game_started(&self) -> bool {
        self.game_started
    }

    /// Number of connected players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Snapshot of one player (tests, diagnostics)
    pub fn player(&self, id: PlayerId) -> Option<&PlayerSnapshot> {
        self.players.get(&id)
    }

    /// Register a new connection: assign an identity, echo the full
    /// roster back to the joiner, and announce the roster to everyone
    pub fn join(&mut self, name: String, outbox: UnboundedSender<ServerMessage>) -> PlayerId {
        let id = PlayerId(self.next_id);
        self.next_id += 1;

        self.players.insert(
            id,
            PlayerSnapshot {
                id,
                name,
                position: WireVec3::default(),
                rotation: WireVec3::default(),
                health: MAX_HEALTH,
                score: 0,
                ready: false,
                eliminated: false,
            },
        );
        self.outboxes.insert(id, outbox);

        log::info!("player {id} joined ({} connected)", self.players.len());

        self.send_to(
            id,
            &ServerMessage::Joined {
                id,
                players: self.players.clone(),
            },
        );
        self.broadcast_roster();
        id
    }

    /// Handle one post-join message from `from`
    pub fn handle(&mut self, from: PlayerId, msg: ClientMessage) -> Option<RelayCommand> {
        match msg {
            ClientMessage::Join { .. } => {
                // join is handled at connection time; a repeat is a no-op
                None
            }
            ClientMessage::Ready => {
                if let Some(player) = self.players.get_mut(&from) {
                    player.ready = true;
                }
                self.broadcast_roster();
                self.maybe_begin_countdown()
            }
            ClientMessage::StartGame => {
                // explicit start request, honored only when the lobby
                // would auto-start anyway
                self.maybe_begin_countdown()
            }
            ClientMessage::Update {
                position,
                rotation,
                health,
                score,
            } => {
                // unknown sender: silent no-op, retried next report
                if let Some(player) = self.players.get_mut(&from) {
                    player.position = position;
                    player.rotation = rotation;
                    player.health = health.clamp(0, MAX_HEALTH);
                    player.score = score;
                    if player.health == 0 {
                        player.eliminated = true;
                    }
                }
                self.broadcast(&ServerMessage::GameState {
                    players: self.players.clone(),
                    game_started: self.game_started,
                });
                None
            }
            ClientMessage::Shoot {
                position,
                direction,
            } => {
                // fire-and-forget: everyone but the shooter gets the visual
                let shot = ServerMessage::Shoot {
                    player_id: from,
                    position,
                    direction,
                };
                for (&id, outbox) in &self.outboxes {
                    if id != from && outbox.send(shot.clone()).is_err() {
                        log::warn!("dropping message to {id}: socket closed");
                    }
                }
                None
            }
            ClientMessage::GameOver => {
                if let Some(player) = self.players.get_mut(&from) {
                    player.eliminated = true;
                    player.health = 0;
                }
                self.check_session_end();
                None
            }
        }
    }

    /// Remove a disconnected player. Dropping below the readiness
    /// threshold reverts a pending or running session to not-started.
    pub fn disconnect(&mut self, id: PlayerId) {
        self.players.remove(&id);
        self.outboxes.remove(&id);
        log::info!("player {id} disconnected ({} remain)", self.players.len());

        if self.players.len() < MIN_PLAYERS {
            if self.game_started || self.countdown_running {
                log::info!("too few players; session reverts to lobby");
            }
            self.game_started = false;
            self.countdown_running = false;
        } else if self.game_started {
            self.check_session_end();
        }
        self.broadcast_roster();
    }

    /// Finish the countdown the socket layer ran. Starts the session if
    /// the lobby still qualifies, otherwise falls back to the lobby.
    ///
    /// `generation` is the tag issued with [`RelayCommand::BeginCountdown`];
    /// a countdown invalidated by a lobby change (or superseded by a newer
    /// one) is discarded here so it can never touch a running session.
    pub fn confirm_start(&mut self, generation: u64) {
        if !self.countdown_running || generation != self.countdown_generation {
            log::debug!("discarding stale countdown (generation {generation})");
            return;
        }
        self.countdown_running = false;
        if self.game_started {
            return;
        }
        if !self.all_ready() {
            log::info!("countdown aborted; lobby no longer ready");
            self.broadcast_roster();
            return;
        }

        for player in self.players.values_mut() {
            player.health = MAX_HEALTH;
            player.score = 0;
            player.eliminated = false;
            player.position = WireVec3::default();
            player.rotation = WireVec3::default();
        }
        self.game_started = true;
        log::info!("session started with {} players", self.players.len());

        self.broadcast(&ServerMessage::GameStarted);
        self.broadcast(&ServerMessage::GameState {
            players: self.players.clone(),
            game_started: true,
        });
    }

    /// Broadcast one countdown tick, unless the countdown went stale
    pub fn broadcast_countdown(&self, generation: u64, time_left: u32) {
        if self.countdown_running && generation == self.countdown_generation {
            self.broadcast(&ServerMessage::Countdown { time_left });
        }
    }

    fn all_ready(&self) -> bool {
        self.players.len() >= MIN_PLAYERS && self.players.values().all(|p| p.ready)
    }

    fn maybe_begin_countdown(&mut self) -> Option<RelayCommand> {
        if self.game_started || self.countdown_running || !self.all_ready() {
            return None;
        }
        self.countdown_running = true;
        self.countdown_generation += 1;
        log::info!("lobby ready; starting countdown");
        Some(RelayCommand::BeginCountdown {
            generation: self.countdown_generation,
        })
    }

    /// End the session once at most one player is still standing
    fn check_session_end(&mut self) {
        if !self.game_started {
            return;
        }
        let mut survivors = self.players.values().filter(|p| !p.eliminated);
        let winner = survivors.next().map(|p| p.name.clone());
        if survivors.next().is_some() {
            return; // two or more still in play
        }

        log::info!("session over, winner: {winner:?}");
        self.game_started = false;
        for player in self.players.values_mut() {
            player.ready = false;
        }
        self.broadcast(&ServerMessage::GameOver { winner });
        self.broadcast_roster();
    }

    fn broadcast_roster(&self) {
        self.broadcast(&ServerMessage::PlayersUpdated {
            players: self.players.clone(),
            game_started: self.game_started,
        });
    }

    /// Fan a message out to every connection
    pub fn broadcast(&self, msg: &ServerMessage) {
        for (&id, outbox) in &self.outboxes {
            if outbox.send(msg.clone()).is_err() {
                log::warn!("dropping message to {id}: socket closed");
            }
        }
    }

    fn send_to(&self, id: PlayerId, msg: &ServerMessage) {
        if let Some(outbox) = self.outboxes.get(&id) {
            if outbox.send(msg.clone()).is_err() {
                log::warn!("dropping message to {id}: socket closed");
            }
        }
    }
}
