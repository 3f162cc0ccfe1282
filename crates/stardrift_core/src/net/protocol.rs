//! Wire protocol
//!
//! JSON messages over a persistent duplex connection, shaped to match
//! what the browser client already speaks: a `type` tag plus camelCase
//! payload fields.

use crate::foundation::math::Vec3;
use crate::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 3-component vector as the browser sends it (`{x, y, z}`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct WireVec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl From<Vec3> for WireVec3 {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<WireVec3> for Vec3 {
    fn from(v: WireVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Snapshot of one player as carried in broadcasts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Relay-assigned identity
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Position
    pub position: WireVec3,
    /// Rotation (Euler radians)
    pub rotation: WireVec3,
    /// Health in [0, 100]
    pub health: i32,
    /// Score
    pub score: u32,
    /// Lobby ready flag
    pub ready: bool,
    /// Terminal elimination flag
    pub eliminated: bool,
}

impl From<&Player> for PlayerSnapshot {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            position: player.position.into(),
            rotation: player.rotation.into(),
            health: player.health,
            score: player.score,
            ready: player.ready,
            eliminated: player.eliminated,
        }
    }
}

impl From<&PlayerSnapshot> for Player {
    fn from(snap: &PlayerSnapshot) -> Self {
        Self {
            id: snap.id,
            name: snap.name.clone(),
            position: snap.position.into(),
            rotation: snap.rotation.into(),
            health: snap.health.clamp(0, crate::player::MAX_HEALTH),
            score: snap.score,
            ready: snap.ready,
            eliminated: snap.eliminated,
        }
    }
}

/// Client-to-server messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Enter the lobby
    Join {
        /// Display name
        name: String,
    },

    /// Flag readiness in the lobby
    Ready,

    /// Request a session start (honored only when everyone is ready)
    StartGame,

    /// Per-tick local state report
    Update {
        /// Position
        position: WireVec3,
        /// Rotation
        rotation: WireVec3,
        /// Health
        health: i32,
        /// Score
        score: u32,
    },

    /// Projectile fired (relayed untouched to the other clients)
    Shoot {
        /// Muzzle position
        position: WireVec3,
        /// Fire direction
        direction: WireVec3,
    },

    /// The sender's player was eliminated
    GameOver,
}

/// Server-to-client messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Join acknowledged; carries the assigned id and the full roster
    Joined {
        /// Assigned identity
        id: PlayerId,
        /// Current roster
        players: HashMap<PlayerId, PlayerSnapshot>,
    },

    /// Lobby roster changed
    #[serde(rename_all = "camelCase")]
    PlayersUpdated {
        /// Current roster
        players: HashMap<PlayerId, PlayerSnapshot>,
        /// Whether a session is in progress
        game_started: bool,
    },

    /// In-game state broadcast
    #[serde(rename_all = "camelCase")]
    GameState {
        /// Current roster
        players: HashMap<PlayerId, PlayerSnapshot>,
        /// Whether a session is in progress
        game_started: bool,
    },

    /// Session has started (older clients say "gameStart")
    #[serde(alias = "gameStart")]
    GameStarted,

    /// Pre-start countdown tick
    #[serde(rename_all = "camelCase")]
    Countdown {
        /// Seconds remaining
        time_left: u32,
    },

    /// Another player fired; relayed for client-side visuals only
    #[serde(rename_all = "camelCase")]
    Shoot {
        /// Who fired
        player_id: PlayerId,
        /// Muzzle position
        position: WireVec3,
        /// Fire direction
        direction: WireVec3,
    },

    /// Session ended
    GameOver {
        /// Name of the surviving player, if any
        winner: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_use_the_browser_tags() {
        let joined = serde_json::to_value(ClientMessage::Join {
            name: "ace".to_string(),
        })
        .unwrap();
        assert_eq!(joined["type"], "join");
        assert_eq!(joined["name"], "ace");

        let start = serde_json::to_value(ClientMessage::StartGame).unwrap();
        assert_eq!(start["type"], "startGame");

        let over = serde_json::to_value(ClientMessage::GameOver).unwrap();
        assert_eq!(over["type"], "gameOver");
    }

    #[test]
    fn update_carries_xyz_objects() {
        let value = serde_json::to_value(ClientMessage::Update {
            position: WireVec3 {
                x: 1.0,
                y: 2.0,
                z: 3.0,
            },
            rotation: WireVec3::default(),
            health: 90,
            score: 5,
        })
        .unwrap();
        assert_eq!(value["position"]["x"], 1.0);
        assert_eq!(value["position"]["z"], 3.0);
        assert_eq!(value["health"], 90);
    }

    #[test]
    fn server_messages_round_trip() {
        let mut players = HashMap::new();
        let player = Player::new(PlayerId(3), "ace");
        players.insert(player.id, PlayerSnapshot::from(&player));

        let msg = ServerMessage::GameState {
            players,
            game_started: true,
        };
        let text = serde_json::to_string(&msg).unwrap();
        assert!(text.contains("\"gameStarted\":true"));

        let parsed: ServerMessage = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn game_start_alias_is_accepted() {
        let parsed: ServerMessage = serde_json::from_str(r#"{"type":"gameStart"}"#).unwrap();
        assert_eq!(parsed, ServerMessage::GameStarted);
        let parsed: ServerMessage = serde_json::from_str(r#"{"type":"gameStarted"}"#).unwrap();
        assert_eq!(parsed, ServerMessage::GameStarted);
    }

    #[test]
    fn countdown_uses_camel_case_field() {
        let value = serde_json::to_value(ServerMessage::Countdown { time_left: 3 }).unwrap();
        assert_eq!(value["timeLeft"], 3);
    }

    #[test]
    fn relayed_shot_names_the_shooter() {
        let value = serde_json::to_value(ServerMessage::Shoot {
            player_id: PlayerId(4),
            position: WireVec3::default(),
            direction: WireVec3 {
                x: 0.0,
                y: 0.0,
                z: -1.0,
            },
        })
        .unwrap();
        assert_eq!(value["type"], "shoot");
        assert_eq!(value["playerId"], 4);
        assert_eq!(value["direction"]["z"], -1.0);
    }

    #[test]
    fn snapshot_round_trips_through_player() {
        let mut player = Player::new(PlayerId(9), "ace");
        player.position = Vec3::new(1.0, 2.0, 3.0);
        player.health = 40;
        let snap = PlayerSnapshot::from(&player);
        let back = Player::from(&snap);
        assert_eq!(back.position, player.position);
        assert_eq!(back.health, player.health);
        assert_eq!(back.name, player.name);
    }
}
