//! Scheduled simulation events
//!
//! Wave stagger, spawn delays, and countdowns are modeled as events on a
//! session-clock queue rather than recursive timers. Every event carries
//! the session generation it was scheduled under; a session reset bumps
//! the generation, so callbacks from a previous session drain away
//! harmlessly instead of mutating the new one.

use crate::entity::AsteroidKind;
use crate::foundation::math::Vec3;

/// Work item executed when its due time passes
#[derive(Debug, Clone)]
pub enum EventKind {
    /// Materialize one asteroid of a planned wave
    SpawnAsteroid {
        /// World position for the spawn
        position: Vec3,
        /// Behavior variant
        kind: AsteroidKind,
        /// Velocity assigned at plan time
        velocity: Vec3,
    },
}

#[derive(Debug, Clone)]
struct ScheduledEvent {
    due: f64,
    generation: u64,
    kind: EventKind,
}

/// Session-clock event queue with generation-based cancellation
#[derive(Debug, Default)]
pub struct Scheduler {
    /// Sorted ascending by due time
    events: Vec<ScheduledEvent>,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to run at session-clock time `due`, tagged with the
    /// current session generation
    pub fn schedule(&mut self, due: f64, generation: u64, kind: EventKind) {
        let at = self.events.partition_point(|e| e.due <= due);
        self.events.insert(
            at,
            ScheduledEvent {
                due,
                generation,
                kind,
            },
        );
    }

    /// Pop every event due at or before `now`. Events scheduled under an
    /// older generation are silently discarded.
    pub fn drain_due(&mut self, now: f64, generation: u64) -> Vec<EventKind> {
        let due_count = self.events.partition_point(|e| e.due <= now);
        self.events
            .drain(..due_count)
            .filter(|e| e.generation == generation)
            .map(|e| e.kind)
            .collect()
    }

    /// Drop every pending event (session teardown)
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of pending events
    pub fn pending(&self) -> usize {
        self.events.len()
    }
}
