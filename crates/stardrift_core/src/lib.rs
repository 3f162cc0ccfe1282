//! # Stardrift Core
//!
//! The simulation core for Stardrift, a multiplayer asteroid-field flight
//! game. This crate owns everything that has to stay consistent across
//! frames and across clients:
//!
//! - **Object pool**: reusable asteroid slots with bounded growth and
//!   recycle-oldest behavior at the ceiling
//! - **Spawn director**: guaranteed-minimum asteroid counts, biased
//!   in-path placement, and organized wave patterns
//! - **Targeting/motion**: exponential homing toward the player
//! - **Collision & damage**: nearest-hit resolution with damage cooldown
//!   and a single elimination transition
//! - **Difficulty controller**: distance-milestone escalation
//! - **Network reconciliation**: client-side merge of server broadcasts
//!   plus the wire protocol shared with `stardrift_server`
//!
//! Rendering, UI, and asset decoding live outside this crate; the core
//! pushes transforms into a [`render::RenderSink`] and reads discrete
//! controls from an [`input::InputSource`].
//!
//! ## Quick start (single-player)
//!
//! ```rust,no_run
//! use stardrift_core::config::GameConfig;
//! use stardrift_core::net::local::LocalGame;
//!
//! let mut game = LocalGame::new(GameConfig::default(), "pilot");
//! loop {
//!     game.pump();
//!     if !game.session().is_running() {
//!         break;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;

pub mod assets;
pub mod collision;
pub mod config;
pub mod difficulty;
pub mod entity;
pub mod input;
pub mod motion;
pub mod net;
pub mod player;
pub mod pool;
pub mod render;
pub mod schedule;
pub mod session;
pub mod spawn;
pub mod waves;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::GameConfig,
        entity::{Asteroid, AsteroidKind},
        foundation::{
            math::{Transform, Vec3},
            time::Timer,
        },
        input::{InputSource, InputState},
        net::local::{LocalGame, LocalTransport},
        net::protocol::{ClientMessage, ServerMessage},
        player::{Player, PlayerId},
        pool::{AsteroidHandle, AsteroidPool},
        render::{NullRenderSink, RenderSink},
        session::GameSession,
    };
}
