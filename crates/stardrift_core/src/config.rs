//! Configuration system
//!
//! Tuning constants for the simulation. All of these are illustrative
//! defaults rather than load-bearing contracts; the shapes of the
//! algorithms they feed (biased placement, spacing rejection, exponential
//! homing, milestone difficulty) are what matter.

use serde::{Deserialize, Serialize};

/// Configuration trait for types that load from disk
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a TOML file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to a TOML file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        if !path.ends_with(".toml") {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Load from file, falling back to defaults when the file is missing
    /// or malformed (a bad config never blocks startup)
    fn load_or_default(path: &str) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("failed to load config from {path}: {e}; using defaults");
                Self::default()
            }
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Object pool settings
    pub pool: PoolConfig,

    /// Spawn director settings
    pub spawn: SpawnConfig,

    /// Wave spawning settings
    pub waves: WaveConfig,

    /// Homing motion settings
    pub motion: MotionConfig,

    /// Collision and damage settings
    pub combat: CombatConfig,

    /// Difficulty progression settings
    pub difficulty: DifficultyConfig,

    /// Player flight settings
    pub flight: FlightConfig,
}

impl Config for GameConfig {}

/// Object pool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Slots allocated up front
    pub initial_size: usize,

    /// Hard ceiling on total slots; at the ceiling the oldest active
    /// asteroid is recycled instead of allocating
    pub ceiling: usize,

    /// Fractional growth per expansion (0.2 = +20%)
    pub growth_factor: f32,

    /// Minimum slots added per expansion
    pub min_growth: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_size: 48,
            ceiling: 192,
            growth_factor: 0.2,
            min_growth: 10,
        }
    }
}

/// Spawn director settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Baseline guaranteed active asteroid count at difficulty 1
    pub base_count: usize,

    /// Extra guaranteed asteroids per difficulty level above 1
    pub count_per_level: usize,

    /// Guaranteed count contribution per unit of player speed
    pub speed_weight: f32,

    /// Maximum asteroids spawned in a single scheduling tick
    pub per_tick_cap: usize,

    /// Probability of placing a spawn directly in the flight path
    pub in_path_chance: f64,

    /// Distance range ahead of the player for in-path spawns
    pub in_path_distance: (f32, f32),

    /// Lateral jitter for in-path spawns
    pub in_path_jitter: f32,

    /// Lateral offset range for near-path spawns
    pub near_path_offset: (f32, f32),

    /// Minimum spacing between any two active asteroids at spawn time
    pub min_spacing: f32,

    /// Placement attempts before the spawn is skipped for the tick
    pub max_placement_attempts: u32,

    /// Hunter promotion chance per difficulty level
    pub hunter_chance_per_level: f64,

    /// Cap on hunter promotion chance
    pub hunter_chance_cap: f64,

    /// Asteroid speed range (regular)
    pub speed_range: (f32, f32),

    /// Scale range for spawned asteroids
    pub scale_range: (f32, f32),

    /// Interval between scheduling ticks in seconds
    pub tick_interval: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            base_count: 10,
            count_per_level: 2,
            speed_weight: 0.08,
            per_tick_cap: 4,
            in_path_chance: 0.75,
            in_path_distance: (160.0, 420.0),
            in_path_jitter: 14.0,
            near_path_offset: (45.0, 110.0),
            min_spacing: 24.0,
            max_placement_attempts: 8,
            hunter_chance_per_level: 0.05,
            hunter_chance_cap: 0.35,
            speed_range: (18.0, 42.0),
            scale_range: (0.8, 2.6),
            tick_interval: 0.5,
        }
    }
}

/// Wave spawning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Asteroids per wave at difficulty 1 (min, max)
    pub count_bounds: (u32, u32),

    /// Seconds between waves at difficulty 1 (min, max)
    pub delay_bounds: (f32, f32),

    /// Per-asteroid spawn stagger within a wave, seconds (min, max)
    pub stagger: (f32, f32),

    /// Probability a wave uses a structured pattern over scattered
    pub structured_chance: f64,

    /// Wall gap width at difficulty 1; shrinks with difficulty
    pub wall_gap: f32,

    /// Tunnel corridor width at difficulty 1; narrows with difficulty
    pub tunnel_width: f32,

    /// Distance ahead of the player at which waves materialize
    pub lead_distance: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            count_bounds: (6, 10),
            delay_bounds: (8.0, 14.0),
            stagger: (0.04, 0.18),
            structured_chance: 0.9,
            wall_gap: 60.0,
            tunnel_width: 70.0,
            lead_distance: 320.0,
        }
    }
}

/// Homing motion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Hard upper bound on per-tick steering blend; must stay below 1.0
    /// so homing never snaps straight onto the player
    pub max_adjustment: f32,

    /// Range inside which proximity starts amplifying steering
    pub proximity_range: f32,

    /// Proximity range for hunters (tighter, ramps harder)
    pub hunter_proximity_range: f32,

    /// Accuracy jitter bounds for regular asteroids
    pub jitter: (f32, f32),

    /// Accuracy jitter bounds for hunters (less jitter, more accurate)
    pub hunter_jitter: (f32, f32),
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_adjustment: 0.35,
            proximity_range: 240.0,
            hunter_proximity_range: 120.0,
            jitter: (0.6, 1.0),
            hunter_jitter: (0.85, 1.0),
        }
    }
}

/// Collision and damage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Player collision radius
    pub player_radius: f32,

    /// Base asteroid collision radius, scaled by asteroid size
    pub asteroid_radius: f32,

    /// Damage per asteroid hit
    pub hit_damage: i32,

    /// Seconds after a hit during which further hits are ignored
    pub damage_cooldown: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            player_radius: 3.0,
            asteroid_radius: 4.0,
            hit_damage: 10,
            damage_cooldown: 0.15,
        }
    }
}

/// Difficulty progression settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Distance between difficulty milestones
    pub milestone_spacing: f32,

    /// Cap on wave asteroid counts as difficulty scales them up
    pub wave_count_cap: u32,

    /// Floor on wave delays as difficulty shrinks them
    pub wave_delay_floor: f32,

    /// Floor on the wall gap as difficulty shrinks it
    pub wall_gap_floor: f32,

    /// Floor on the tunnel width as difficulty narrows it
    pub tunnel_width_floor: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            milestone_spacing: 300.0,
            wave_count_cap: 22,
            wave_delay_floor: 2.5,
            wall_gap_floor: 22.0,
            tunnel_width_floor: 28.0,
        }
    }
}

/// Player flight settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Base forward speed at session start
    pub base_speed: f32,

    /// Fixed speed gain per milestone during the early phase
    pub early_gain: f32,

    /// Speed threshold that ends the early phase
    pub early_threshold: f32,

    /// Cap on per-milestone gain in the diminishing phase
    pub late_gain_cap: f32,

    /// Numerator of the diminishing gain curve (gain = numerator / level)
    pub late_gain_numerator: f32,

    /// Lateral maneuvering speed
    pub strafe_speed: f32,

    /// Boost multiplier applied to forward speed
    pub boost_multiplier: f32,

    /// Turn rate in radians per second
    pub turn_rate: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            base_speed: 36.0,
            early_gain: 4.0,
            early_threshold: 60.0,
            late_gain_cap: 2.5,
            late_gain_numerator: 12.0,
            strafe_speed: 28.0,
            boost_multiplier: 1.8,
            turn_rate: 1.6,
        }
    }
}
