//! Render interface
//!
//! The simulation core never draws; it pushes transform updates and
//! lifecycle events into a [`RenderSink`] keyed by entity id (the pool
//! slot index). The renderer owns meshes, materials, and the starfield.

use crate::foundation::math::Transform;

/// Receiver for entity transforms and lifecycle events
pub trait RenderSink {
    /// An asteroid entered play
    fn entity_spawned(&mut self, id: u32, transform: &Transform, hunter: bool);

    /// An active asteroid moved
    fn entity_moved(&mut self, id: u32, transform: &Transform);

    /// An asteroid left play
    fn entity_despawned(&mut self, id: u32);

    /// The local player moved
    fn player_moved(&mut self, transform: &Transform);

    /// The local player took a hit (drives shake/flash/audio)
    fn player_hit(&mut self, damage: i32);
}

/// Sink that drops everything (headless runs, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderSink;

impl RenderSink for NullRenderSink {
    fn entity_spawned(&mut self, _id: u32, _transform: &Transform, _hunter: bool) {}
    fn entity_moved(&mut self, _id: u32, _transform: &Transform) {}
    fn entity_despawned(&mut self, _id: u32) {}
    fn player_moved(&mut self, _transform: &Transform) {}
    fn player_hit(&mut self, _damage: i32) {}
}

#[cfg(test)]
pub(crate) mod recording {
    //! Test double that records lifecycle events

    use super::*;

    /// Lifecycle event kinds seen by the sink
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SinkEvent {
        /// entity_spawned
        Spawned(u32),
        /// entity_despawned
        Despawned(u32),
        /// player_hit
        Hit(i32),
    }

    /// Records spawn/despawn/hit events for assertions
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        /// Events in arrival order
        pub events: Vec<SinkEvent>,
    }

    impl RenderSink for RecordingSink {
        fn entity_spawned(&mut self, id: u32, _transform: &Transform, _hunter: bool) {
            self.events.push(SinkEvent::Spawned(id));
        }
        fn entity_moved(&mut self, _id: u32, _transform: &Transform) {}
        fn entity_despawned(&mut self, id: u32) {
            self.events.push(SinkEvent::Despawned(id));
        }
        fn player_moved(&mut self, _transform: &Transform) {}
        fn player_hit(&mut self, damage: i32) {
            self.events.push(SinkEvent::Hit(damage));
        }
    }
}
