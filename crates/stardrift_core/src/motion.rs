//! Targeting and motion model
//!
//! Each active asteroid steers toward the player through an exponential
//! homing filter: the velocity direction is blended a bounded step toward
//! the ideal direction every tick, scaled by the asteroid's targeting
//! factor and speed, a proximity factor (close-range encounters are
//! harder to dodge), and an accuracy jitter (hunters jitter less). The
//! blend weight is always clamped below 1, so an asteroid never snaps
//! onto the ideal direction in a single tick.

use crate::config::MotionConfig;
use crate::entity::{Asteroid, AsteroidKind};
use crate::foundation::math::{normalize_or, Vec3};
use rand::Rng;

/// Applies homing and integration to active asteroids
#[derive(Debug)]
pub struct MotionModel {
    config: MotionConfig,
}

impl MotionModel {
    /// Create a motion model with the given tuning
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    /// Steer one asteroid toward `player_pos` and integrate its transform
    /// over `dt`
    pub fn step(&self, asteroid: &mut Asteroid, player_pos: &Vec3, dt: f32, rng: &mut impl Rng) {
        let to_player = player_pos - asteroid.position;
        let distance = to_player.magnitude();

        if asteroid.targeting_factor > 0.0 && distance > 1e-3 {
            let ideal = to_player / distance;

            let range = match asteroid.kind {
                AsteroidKind::Regular => self.config.proximity_range,
                AsteroidKind::Hunter => self.config.hunter_proximity_range,
            };
            // 1.0 at the edge of range, up to 2.0 (3.0 for hunters) at point blank
            let closeness = (1.0 - (distance / range).min(1.0)).max(0.0);
            let proximity = match asteroid.kind {
                AsteroidKind::Regular => 1.0 + closeness,
                AsteroidKind::Hunter => 1.0 + closeness * 2.0,
            };

            let (jitter_lo, jitter_hi) = match asteroid.kind {
                AsteroidKind::Regular => self.config.jitter,
                AsteroidKind::Hunter => self.config.hunter_jitter,
            };
            let jitter = rng.gen_range(jitter_lo..=jitter_hi);

            let adjustment = (asteroid.targeting_factor
                * asteroid.targeting_speed
                * proximity
                * jitter
                * dt)
                .clamp(0.0, self.config.max_adjustment);

            let speed = asteroid.velocity.magnitude();
            let current_dir = normalize_or(&asteroid.velocity, ideal);
            let blended = normalize_or(&current_dir.lerp(&ideal, adjustment), ideal);
            asteroid.velocity = blended * speed;
        }

        asteroid.position += asteroid.velocity * dt;
        asteroid.rotation += asteroid.angular_velocity * dt;
    }
}
