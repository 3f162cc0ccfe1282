//! Transport seam and the single-player stub
//!
//! Multiplayer talks to the relay through a socket implementing
//! [`Transport`]; single-player mode bypasses the network entirely with
//! [`LocalTransport`], which implements the same message interface as
//! local state mutations with no transport at all.

use crate::config::GameConfig;
use crate::foundation::time::Timer;
use crate::input::InputState;
use crate::net::protocol::{ClientMessage, ServerMessage};
use crate::player::PlayerId;
use crate::render::{NullRenderSink, RenderSink};
use crate::session::GameSession;

/// Outbound message channel to the relay (or to nowhere)
pub trait Transport {
    /// Whether this transport is the in-process single-player stub
    fn is_local(&self) -> bool {
        false
    }

    /// Whether messages can currently be delivered
    fn connected(&self) -> bool;

    /// Best-effort send. A closed transport drops the message with a
    /// logged warning; there is no retry or backoff.
    fn send(&mut self, msg: &ClientMessage);

    /// Broadcasts received since the last poll
    fn poll(&mut self) -> Vec<ServerMessage>;
}

/// No-op transport for single-player mode
#[derive(Debug, Default)]
pub struct LocalTransport {
    shots_fired: u32,
    game_over: bool,
}

impl LocalTransport {
    /// Create the stub
    pub fn new() -> Self {
        Self::default()
    }

    /// Shots reported through this stub
    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    /// Whether a game-over report went through this stub
    pub fn sent_game_over(&self) -> bool {
        self.game_over
    }
}

impl Transport for LocalTransport {
    fn is_local(&self) -> bool {
        true
    }

    fn connected(&self) -> bool {
        true
    }

    fn send(&mut self, msg: &ClientMessage) {
        // local state is already authoritative; only the bookkeeping
        // side effects remain
        match msg {
            ClientMessage::Shoot { .. } => self.shots_fired += 1,
            ClientMessage::GameOver => self.game_over = true,
            _ => {}
        }
    }

    fn poll(&mut self) -> Vec<ServerMessage> {
        Vec::new()
    }
}

/// Single-player frame-loop driver: a session, the local stub, and a
/// frame timer in one bundle
pub struct LocalGame {
    session: GameSession,
    transport: LocalTransport,
    timer: Timer,
}

impl LocalGame {
    /// Create and immediately start a single-player session
    pub fn new(config: GameConfig, name: impl Into<String>) -> Self {
        let mut session = GameSession::new(config, PlayerId(0), name);
        session.start();
        Self {
            session,
            transport: LocalTransport::new(),
            timer: Timer::new(),
        }
    }

    /// Run one frame with no input and no renderer (headless)
    pub fn pump(&mut self) {
        let mut render = NullRenderSink;
        self.pump_with(&InputState::default(), &mut render);
    }

    /// Run one frame with real input and a real renderer
    pub fn pump_with(&mut self, input: &InputState, render: &mut dyn RenderSink) {
        self.timer.update();
        self.session
            .tick(self.timer.delta_time(), input, render, &mut self.transport);
    }

    /// The underlying session
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Mutable access to the underlying session (reset, broadcasts)
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_reports_connected_and_local() {
        let transport = LocalTransport::new();
        assert!(transport.connected());
        assert!(transport.is_local());
    }

    #[test]
    fn stub_absorbs_messages_without_transport() {
        let mut transport = LocalTransport::new();
        transport.send(&ClientMessage::Ready);
        transport.send(&ClientMessage::Shoot {
            position: Default::default(),
            direction: Default::default(),
        });
        transport.send(&ClientMessage::GameOver);

        assert_eq!(transport.shots_fired(), 1);
        assert!(transport.sent_game_over());
        assert!(transport.poll().is_empty());
    }

    #[test]
    fn local_game_runs_frames() {
        let mut game = LocalGame::new(GameConfig::default(), "solo");
        assert!(game.session().is_running());
        for _ in 0..5 {
            game.pump();
        }
        assert!(game.session().local_player().is_some());
    }
}
