//! Wave spawning
//!
//! Periodically spawns a themed cluster of asteroids in one of several
//! spatial patterns, always navigable:
//!
//! - **wall**: a line across the flight path with a randomized gap sized
//!   inversely to difficulty
//! - **tunnel**: two curving parallel walls forming a corridor that
//!   narrows with difficulty
//! - **spiral**: a tightening helix receding from the player
//! - **scattered**: uniformly randomized filler
//!
//! Pattern choice is weighted heavily toward the structured shapes. Each
//! asteroid in a pattern is scheduled with a staggered delay so a wave
//! fades in instead of popping in at once.

use crate::config::WaveConfig;
use crate::difficulty::DifficultyController;
use crate::entity::AsteroidKind;
use crate::foundation::math::{lateral_axis, normalize_or, Vec3};
use crate::schedule::{EventKind, Scheduler};
use crate::spawn::SpawnContext;
use rand::Rng;

/// Spatial arrangement of a wave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavePattern {
    /// Line across the path with a navigable gap
    Wall,
    /// Navigable corridor of two curving walls
    Tunnel,
    /// Tightening helix receding from the player
    Spiral,
    /// Uniformly randomized cluster
    Scattered,
}

/// Schedules periodic wave spawns
#[derive(Debug)]
pub struct WaveDirector {
    config: WaveConfig,
    next_wave_at: f64,
}

impl WaveDirector {
    /// Create a director whose first wave fires after one full delay
    pub fn new(config: WaveConfig) -> Self {
        let next_wave_at = f64::from(config.delay_bounds.0);
        Self {
            config,
            next_wave_at,
        }
    }

    /// If a wave is due, plan it and schedule its staggered spawns under
    /// the given session generation. Returns the chosen pattern.
    pub fn tick(
        &mut self,
        ctx: &SpawnContext,
        difficulty: &DifficultyController,
        scheduler: &mut Scheduler,
        generation: u64,
        rng: &mut impl Rng,
    ) -> Option<WavePattern> {
        if ctx.now < self.next_wave_at {
            return None;
        }

        let (delay_lo, delay_hi) = difficulty.wave_delay_bounds(&self.config);
        self.next_wave_at = ctx.now + f64::from(rng.gen_range(delay_lo..=delay_hi));

        let pattern = self.choose_pattern(rng);
        let (count_lo, count_hi) = difficulty.wave_count_bounds(&self.config);
        let count = rng.gen_range(count_lo..=count_hi);

        let positions = match pattern {
            WavePattern::Wall => self.plan_wall(ctx, difficulty.wall_gap(&self.config), count, rng),
            WavePattern::Tunnel => {
                self.plan_tunnel(ctx, difficulty.tunnel_width(&self.config), count, rng)
            }
            WavePattern::Spiral => self.plan_spiral(ctx, count, rng),
            WavePattern::Scattered => self.plan_scattered(ctx, count, rng),
        };

        log::debug!("wave {pattern:?}: {} asteroids", positions.len());

        let mut delay = 0.0;
        for position in positions {
            delay += rng.gen_range(self.config.stagger.0..=self.config.stagger.1);
            let drift = normalize_or(&(ctx.player_pos - position), -ctx.player_forward)
                * rng.gen_range(2.0..=7.0);
            scheduler.schedule(
                ctx.now + f64::from(delay),
                generation,
                EventKind::SpawnAsteroid {
                    position,
                    kind: AsteroidKind::Regular,
                    velocity: drift,
                },
            );
        }

        Some(pattern)
    }

    fn choose_pattern(&self, rng: &mut impl Rng) -> WavePattern {
        if rng.gen_bool(self.config.structured_chance) {
            match rng.gen_range(0..3) {
                0 => WavePattern::Wall,
                1 => WavePattern::Tunnel,
                _ => WavePattern::Spiral,
            }
        } else {
            WavePattern::Scattered
        }
    }

    /// A line across the flight path, leaving a randomized gap
    fn plan_wall(
        &self,
        ctx: &SpawnContext,
        gap: f32,
        count: u32,
        rng: &mut impl Rng,
    ) -> Vec<Vec3> {
        let side = lateral_axis(&ctx.player_forward);
        let center = ctx.player_pos + ctx.player_forward * self.config.lead_distance;
        let half_width = 140.0;
        let gap_center = rng.gen_range(-half_width * 0.5..=half_width * 0.5);

        let mut positions = Vec::with_capacity(count as usize);
        for i in 0..count {
            let t = if count > 1 {
                i as f32 / (count - 1) as f32
            } else {
                0.5
            };
            let offset = -half_width + t * 2.0 * half_width;
            if (offset - gap_center).abs() < gap * 0.5 {
                continue; // the navigable gap
            }
            positions.push(center + side * offset);
        }
        positions
    }

    /// Two curving walls forming a corridor along the flight path
    fn plan_tunnel(
        &self,
        ctx: &SpawnContext,
        width: f32,
        count: u32,
        rng: &mut impl Rng,
    ) -> Vec<Vec3> {
        let side = lateral_axis(&ctx.player_forward);
        let start = ctx.player_pos + ctx.player_forward * self.config.lead_distance;
        let spacing = 26.0;
        let phase = rng.gen_range(0.0..std::f32::consts::TAU);
        let curve_amp = rng.gen_range(10.0..=26.0);

        let pairs = (count / 2).max(1);
        let mut positions = Vec::with_capacity((pairs * 2) as usize);
        for i in 0..pairs {
            let depth = i as f32 * spacing;
            let curve = (phase + depth * 0.02).sin() * curve_amp;
            let center = start + ctx.player_forward * depth + side * curve;
            positions.push(center + side * (width * 0.5));
            positions.push(center - side * (width * 0.5));
        }
        positions
    }

    /// A tightening helix receding from the player
    fn plan_spiral(&self, ctx: &SpawnContext, count: u32, rng: &mut impl Rng) -> Vec<Vec3> {
        let side = lateral_axis(&ctx.player_forward);
        let up = normalize_or(&ctx.player_forward.cross(&side), Vec3::new(0.0, 1.0, 0.0));
        let start = ctx.player_pos + ctx.player_forward * self.config.lead_distance;
        let phase = rng.gen_range(0.0..std::f32::consts::TAU);

        let mut positions = Vec::with_capacity(count as usize);
        for i in 0..count {
            let t = i as f32 / count.max(1) as f32;
            let angle = phase + t * std::f32::consts::TAU * 2.0;
            let radius = 80.0 * (1.0 - t * 0.7); // tightens as it recedes
            let depth = t * 180.0;
            positions.push(
                start
                    + ctx.player_forward * depth
                    + side * (angle.cos() * radius)
                    + up * (angle.sin() * radius),
            );
        }
        positions
    }

    /// Uniformly randomized cluster ahead of the player
    fn plan_scattered(&self, ctx: &SpawnContext, count: u32, rng: &mut impl Rng) -> Vec<Vec3> {
        let side = lateral_axis(&ctx.player_forward);
        let up = normalize_or(&ctx.player_forward.cross(&side), Vec3::new(0.0, 1.0, 0.0));
        let start = ctx.player_pos + ctx.player_forward * self.config.lead_distance;

        (0..count)
            .map(|_| {
                start
                    + ctx.player_forward * rng.gen_range(0.0..=160.0)
                    + side * rng.gen_range(-120.0..=120.0)
                    + up * rng.gen_range(-80.0..=80.0)
            })
            .collect()
    }

    /// Reset the wave clock for a new session
    pub fn reset(&mut self) {
        self.next_wave_at = f64::from(self.config.delay_bounds.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DifficultyConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ctx(now: f64) -> SpawnContext {
        SpawnContext {
            player_pos: Vec3::zeros(),
            player_forward: Vec3::new(0.0, 0.0, -1.0),
            player_speed: 36.0,
            difficulty_level: 1,
            now,
        }
    }

    #[test]
    fn waves_fire_on_their_interval() {
        let config = WaveConfig::default();
        let mut director = WaveDirector::new(config.clone());
        let difficulty = DifficultyController::new(DifficultyConfig::default());
        let mut scheduler = Scheduler::new();
        let mut rng = StdRng::seed_from_u64(2);

        assert!(director
            .tick(&ctx(0.0), &difficulty, &mut scheduler, 0, &mut rng)
            .is_none());

        let late = f64::from(config.delay_bounds.0) + 0.1;
        assert!(director
            .tick(&ctx(late), &difficulty, &mut scheduler, 0, &mut rng)
            .is_some());
        assert!(scheduler.pending() > 0);
    }

    #[test]
    fn wall_leaves_a_navigable_gap() {
        let config = WaveConfig::default();
        let director = WaveDirector::new(config.clone());
        let mut rng = StdRng::seed_from_u64(4);
        let context = ctx(0.0);

        let positions = director.plan_wall(&context, config.wall_gap, 12, &mut rng);
        assert!(!positions.is_empty());
        // the gap removed at least one slot from the full line
        assert!(positions.len() < 12);
    }

    #[test]
    fn tunnel_walls_straddle_the_corridor() {
        let config = WaveConfig::default();
        let director = WaveDirector::new(config.clone());
        let mut rng = StdRng::seed_from_u64(4);
        let context = ctx(0.0);

        let width = config.tunnel_width;
        let positions = director.plan_tunnel(&context, width, 10, &mut rng);
        assert_eq!(positions.len() % 2, 0);

        let side = lateral_axis(&context.player_forward);
        for pair in positions.chunks(2) {
            let spread = (pair[0] - pair[1]).dot(&side).abs();
            assert!((spread - width).abs() < 1e-3);
        }
    }

    #[test]
    fn structured_patterns_dominate() {
        let config = WaveConfig::default();
        let director = WaveDirector::new(config);
        let mut rng = StdRng::seed_from_u64(9);

        let scattered = (0..500)
            .filter(|_| director.choose_pattern(&mut rng) == WavePattern::Scattered)
            .count();
        // about 10% scattered
        assert!(scattered < 100, "scattered count {scattered} too high");
        assert!(scattered > 10, "scattered count {scattered} too low");
    }

    #[test]
    fn stale_generation_wave_never_materializes() {
        let config = WaveConfig::default();
        let mut director = WaveDirector::new(config.clone());
        let difficulty = DifficultyController::new(DifficultyConfig::default());
        let mut scheduler = Scheduler::new();
        let mut rng = StdRng::seed_from_u64(2);

        let late = f64::from(config.delay_bounds.1) + 0.1;
        director
            .tick(&ctx(late), &difficulty, &mut scheduler, 0, &mut rng)
            .unwrap();
        assert!(scheduler.pending() > 0);

        // session reset bumped the generation before the stagger elapsed
        let fired = scheduler.drain_due(late + 60.0, 1);
        assert!(fired.is_empty());
    }
}
