//! Difficulty and progression controller
//!
//! Two independent progression axes, both driven by distance traveled:
//!
//! - `difficulty_level` increments at fixed distance milestones and is
//!   monotonically non-decreasing within a session. Each increment moves
//!   the derived wave parameters through clamped step functions, never
//!   unbounded.
//! - Player base speed gets fixed increases per milestone during an early
//!   phase, then diminishing-returns increases with a hard per-increment
//!   cap, so acceleration is felt without runaway velocity.

use crate::config::{DifficultyConfig, FlightConfig, WaveConfig};

/// Distance-milestone difficulty state machine
#[derive(Debug)]
pub struct DifficultyController {
    level: u32,
    distance: f32,
    next_milestone: f32,
    config: DifficultyConfig,
}

impl DifficultyController {
    /// Create a controller at level 1, zero distance
    pub fn new(config: DifficultyConfig) -> Self {
        Self {
            level: 1,
            distance: 0.0,
            next_milestone: config.milestone_spacing,
            config,
        }
    }

    /// Current difficulty level (starts at 1, never decreases)
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Total distance traveled this session
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Advance by a movement delta (or a time x speed integration
    /// fallback). Returns the number of milestones crossed this call.
    pub fn advance(&mut self, distance_delta: f32) -> u32 {
        if distance_delta <= 0.0 {
            return 0;
        }

        self.distance += distance_delta;
        let mut crossed = 0;
        while self.distance >= self.next_milestone {
            self.level += 1;
            self.next_milestone += self.config.milestone_spacing;
            crossed += 1;
            log::info!(
                "difficulty level {} at distance {:.0}",
                self.level,
                self.distance
            );
        }
        crossed
    }

    /// Wave asteroid-count bounds for the current level: grows with
    /// difficulty, capped
    pub fn wave_count_bounds(&self, waves: &WaveConfig) -> (u32, u32) {
        let bump = (self.level - 1) * 2;
        let cap = self.config.wave_count_cap;
        (
            (waves.count_bounds.0 + bump).min(cap),
            (waves.count_bounds.1 + bump).min(cap),
        )
    }

    /// Wave delay bounds for the current level: shrinks with difficulty,
    /// floored
    pub fn wave_delay_bounds(&self, waves: &WaveConfig) -> (f32, f32) {
        let shrink = (self.level - 1) as f32 * 0.6;
        let floor = self.config.wave_delay_floor;
        (
            (waves.delay_bounds.0 - shrink).max(floor),
            (waves.delay_bounds.1 - shrink).max(floor * 1.4),
        )
    }

    /// Wall-pattern gap width for the current level: shrinks, floored
    pub fn wall_gap(&self, waves: &WaveConfig) -> f32 {
        (waves.wall_gap - (self.level - 1) as f32 * 4.0).max(self.config.wall_gap_floor)
    }

    /// Tunnel corridor width for the current level: narrows, floored
    pub fn tunnel_width(&self, waves: &WaveConfig) -> f32 {
        (waves.tunnel_width - (self.level - 1) as f32 * 5.0).max(self.config.tunnel_width_floor)
    }

    /// Reset to level 1 for a new session
    pub fn reset(&mut self) {
        self.level = 1;
        self.distance = 0.0;
        self.next_milestone = self.config.milestone_spacing;
    }
}

/// Milestone-driven player speed progression
#[derive(Debug)]
pub struct SpeedProgression {
    speed: f32,
    increments: u32,
    config: FlightConfig,
}

impl SpeedProgression {
    /// Create a progression at the configured base speed
    pub fn new(config: FlightConfig) -> Self {
        Self {
            speed: config.base_speed,
            increments: 0,
            config,
        }
    }

    /// Current base forward speed
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Apply one milestone increment: fixed gain in the early phase,
    /// diminishing (capped) gain past the threshold
    pub fn on_milestone(&mut self) {
        self.increments += 1;
        let gain = if self.speed < self.config.early_threshold {
            self.config.early_gain
        } else {
            (self.config.late_gain_numerator / self.increments as f32)
                .min(self.config.late_gain_cap)
        };
        self.speed += gain;
    }

    /// Reset to base speed for a new session
    pub fn reset(&mut self) {
        self.speed = self.config.base_speed;
        self.increments = 0;
    }
}
