//! Client-side state reconciliation
//!
//! Server broadcasts arrive on the socket callback, which must never
//! interleave with a tick in progress: incoming messages land in a
//! [`StateInbox`] and are applied in one batch at the start of the next
//! tick.
//!
//! The merge policy is deliberate: the mirrored roster is overwritten
//! wholesale from the broadcast, but the local player's own position and
//! rotation are re-applied afterwards, so round-trip latency never makes
//! the player's own ship jitter. Health and score stay authoritative
//! from the server ("trust local for kinematics, trust remote for
//! vitals").

use crate::net::protocol::{PlayerSnapshot, ServerMessage};
use crate::player::{Player, PlayerId};
use std::collections::HashMap;

/// Buffer for broadcasts awaiting the next tick
#[derive(Debug, Default)]
pub struct StateInbox {
    pending: Vec<ServerMessage>,
}

impl StateInbox {
    /// Create an empty inbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a broadcast (called from the socket callback)
    pub fn push(&mut self, msg: ServerMessage) {
        self.pending.push(msg);
    }

    /// Take every buffered broadcast, in arrival order (called at the
    /// start of a tick)
    pub fn drain(&mut self) -> Vec<ServerMessage> {
        std::mem::take(&mut self.pending)
    }

    /// Number of buffered broadcasts
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the inbox is empty
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Merge a broadcast roster into the mirrored player map.
///
/// Every player is overwritten from the broadcast; the local player then
/// gets their pre-merge position and rotation back while keeping the
/// server's health, score, and elimination state.
pub fn merge_players(
    players: &mut HashMap<PlayerId, Player>,
    local_id: PlayerId,
    incoming: &HashMap<PlayerId, PlayerSnapshot>,
) {
    let local_kinematics = players
        .get(&local_id)
        .map(|p| (p.position, p.rotation));

    players.clear();
    for (id, snap) in incoming {
        players.insert(*id, Player::from(snap));
    }

    if let (Some((position, rotation)), Some(local)) =
        (local_kinematics, players.get_mut(&local_id))
    {
        local.position = position;
        local.rotation = rotation;
    }
}
