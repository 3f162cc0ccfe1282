//! Simulation entities

use crate::foundation::math::Vec3;

/// Asteroid behavior variants
///
/// Hunters are a small, difficulty-gated subset with elevated,
/// proximity-adaptive homing accuracy and higher speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AsteroidKind {
    /// Drifting asteroid with a mild, jittery pull toward the player
    #[default]
    Regular,

    /// Aggressive asteroid with reliable close-range homing
    Hunter,
}

impl AsteroidKind {
    /// Speed multiplier applied on top of the rolled base speed
    pub fn speed_multiplier(self) -> f32 {
        match self {
            Self::Regular => 1.0,
            Self::Hunter => 1.45,
        }
    }

    /// Baseline targeting factor range for this kind
    pub fn targeting_factor_range(self) -> (f32, f32) {
        match self {
            Self::Regular => (0.0, 0.45),
            Self::Hunter => (0.7, 1.0),
        }
    }
}

/// A pooled asteroid instance
///
/// Owned exclusively by the pool while inactive; while `active` it is
/// simulated every tick. A slot is either in the free list or simulated,
/// never both.
#[derive(Debug, Clone)]
pub struct Asteroid {
    /// Position in world space
    pub position: Vec3,

    /// Rotation as Euler angles in radians
    pub rotation: Vec3,

    /// Uniform scale
    pub scale: f32,

    /// Linear velocity
    pub velocity: Vec3,

    /// Angular velocity in radians per second, per axis
    pub angular_velocity: Vec3,

    /// Whether this slot is currently in play
    pub active: bool,

    /// Behavior variant
    pub kind: AsteroidKind,

    /// Blend weight between random drift and player-seeking motion, in [0, 1]
    pub targeting_factor: f32,

    /// How quickly the homing filter converges on the ideal direction
    pub targeting_speed: f32,

    /// Session clock time at which this asteroid was (re)activated
    pub spawned_at: f64,
}

impl Default for Asteroid {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: 1.0,
            velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            active: false,
            kind: AsteroidKind::Regular,
            targeting_factor: 0.0,
            targeting_speed: 1.0,
            spawned_at: 0.0,
        }
    }
}

impl Asteroid {
    /// Whether this asteroid is the hunter variant
    pub fn is_hunter(&self) -> bool {
        self.kind == AsteroidKind::Hunter
    }

    /// Reset behavioral state when the slot returns to the free list
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hunters_are_faster_and_more_accurate() {
        assert!(AsteroidKind::Hunter.speed_multiplier() > AsteroidKind::Regular.speed_multiplier());
        let (hunter_lo, _) = AsteroidKind::Hunter.targeting_factor_range();
        let (_, regular_hi) = AsteroidKind::Regular.targeting_factor_range();
        assert!(hunter_lo > regular_hi);
    }

    #[test]
    fn clear_resets_behavioral_flags() {
        let mut asteroid = Asteroid {
            active: true,
            kind: AsteroidKind::Hunter,
            targeting_factor: 0.9,
            ..Asteroid::default()
        };
        asteroid.clear();
        assert!(!asteroid.active);
        assert_eq!(asteroid.kind, AsteroidKind::Regular);
        assert_eq!(asteroid.targeting_factor, 0.0);
    }
}
