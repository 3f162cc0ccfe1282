//! Collision and damage resolution
//!
//! Broad test: squared distance between the player and every active
//! asteroid against the combined radii. Of the candidates found in a
//! tick, only the nearest is resolved (closest-first tie-break), so one
//! crowded frame never lands a multi-hit spike. A short cooldown after
//! each hit swallows follow-up contacts.

use crate::config::CombatConfig;
use crate::foundation::math::Vec3;
use crate::player::{DamageOutcome, Player};
use crate::pool::{AsteroidHandle, AsteroidPool};

/// A resolved player/asteroid hit
#[derive(Debug, Clone, Copy)]
pub struct HitEvent {
    /// The asteroid that hit (already released back to the pool)
    pub asteroid: AsteroidHandle,
    /// Damage applied
    pub damage: i32,
    /// Outcome on the player
    pub outcome: DamageOutcome,
}

/// Player/asteroid collision resolver with damage cooldown
#[derive(Debug)]
pub struct CollisionResolver {
    config: CombatConfig,
    cooldown_until: f64,
}

impl CollisionResolver {
    /// Create a resolver with the given tuning
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            cooldown_until: 0.0,
        }
    }

    /// Detect and resolve at most one hit for this tick.
    ///
    /// The offending asteroid is released back to the pool. Returns the
    /// hit event so the caller can fan out side effects (render despawn,
    /// network notification, elimination handling).
    pub fn resolve(
        &mut self,
        player: &mut Player,
        player_pos: &Vec3,
        pool: &mut AsteroidPool,
        now: f64,
    ) -> Option<HitEvent> {
        let mut nearest: Option<(AsteroidHandle, f32)> = None;

        for (handle, asteroid) in pool.iter_active() {
            let radius = self.config.player_radius + self.config.asteroid_radius * asteroid.scale;
            let dist_sq = (asteroid.position - player_pos).magnitude_squared();
            if dist_sq < radius * radius
                && nearest.map_or(true, |(_, best)| dist_sq < best)
            {
                nearest = Some((handle, dist_sq));
            }
        }

        let (handle, _) = nearest?;

        // contact inside the cooldown window: swallow it, leave the
        // asteroid in play
        if now < self.cooldown_until {
            return None;
        }

        self.cooldown_until = now + f64::from(self.config.damage_cooldown);
        let outcome = player.apply_damage(self.config.hit_damage);

        if pool.release(handle).is_err() {
            log::warn!("hit asteroid {handle:?} was already released");
        }

        Some(HitEvent {
            asteroid: handle,
            damage: self.config.hit_damage,
            outcome,
        })
    }

    /// Reset the cooldown for a new session
    pub fn reset(&mut self) {
        self.cooldown_until = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::player::{PlayerId, MAX_HEALTH};

    fn setup() -> (CollisionResolver, Player, AsteroidPool) {
        (
            CollisionResolver::new(CombatConfig::default()),
            Player::new(PlayerId(1), "pilot"),
            AsteroidPool::new(PoolConfig::default()),
        )
    }

    fn spawn_at(pool: &mut AsteroidPool, pos: Vec3, now: f64) -> AsteroidHandle {
        let handle = pool.acquire(now);
        let asteroid = pool.get_mut(handle).unwrap();
        asteroid.position = pos;
        asteroid.scale = 1.0;
        handle
    }

    #[test]
    fn hit_applies_damage_and_releases_asteroid() {
        let (mut resolver, mut player, mut pool) = setup();
        let handle = spawn_at(&mut pool, Vec3::new(1.0, 0.0, 0.0), 0.0);

        let hit = resolver
            .resolve(&mut player, &Vec3::zeros(), &mut pool, 1.0)
            .unwrap();
        assert_eq!(hit.damage, 10);
        assert_eq!(player.health, MAX_HEALTH - 10);
        assert!(pool.get(handle).is_none());
    }

    #[test]
    fn far_asteroids_do_not_hit() {
        let (mut resolver, mut player, mut pool) = setup();
        spawn_at(&mut pool, Vec3::new(100.0, 0.0, 0.0), 0.0);

        assert!(resolver
            .resolve(&mut player, &Vec3::zeros(), &mut pool, 1.0)
            .is_none());
        assert_eq!(player.health, MAX_HEALTH);
    }

    #[test]
    fn only_nearest_candidate_resolves_per_tick() {
        let (mut resolver, mut player, mut pool) = setup();
        let far = spawn_at(&mut pool, Vec3::new(3.0, 0.0, 0.0), 0.0);
        let near = spawn_at(&mut pool, Vec3::new(1.0, 0.0, 0.0), 0.0);

        let hit = resolver
            .resolve(&mut player, &Vec3::zeros(), &mut pool, 1.0)
            .unwrap();
        assert_eq!(hit.asteroid, near);
        // the farther candidate survives the tick
        assert!(pool.get(far).is_some());
        assert_eq!(player.health, MAX_HEALTH - 10);
    }

    #[test]
    fn cooldown_swallows_followup_hits() {
        let (mut resolver, mut player, mut pool) = setup();
        spawn_at(&mut pool, Vec3::new(1.0, 0.0, 0.0), 0.0);
        spawn_at(&mut pool, Vec3::new(1.5, 0.0, 0.0), 0.0);

        assert!(resolver
            .resolve(&mut player, &Vec3::zeros(), &mut pool, 1.0)
            .is_some());
        // 150ms cooldown: a contact 50ms later is ignored
        assert!(resolver
            .resolve(&mut player, &Vec3::zeros(), &mut pool, 1.05)
            .is_none());
        assert_eq!(player.health, MAX_HEALTH - 10);

        // past the window the next hit lands
        assert!(resolver
            .resolve(&mut player, &Vec3::zeros(), &mut pool, 1.3)
            .is_some());
        assert_eq!(player.health, MAX_HEALTH - 20);
    }

    #[test]
    fn lethal_hit_eliminates_exactly_once() {
        let (mut resolver, mut player, mut pool) = setup();
        player.health = 10;
        spawn_at(&mut pool, Vec3::new(1.0, 0.0, 0.0), 0.0);

        let hit = resolver
            .resolve(&mut player, &Vec3::zeros(), &mut pool, 1.0)
            .unwrap();
        assert_eq!(hit.outcome, DamageOutcome::Eliminated);
        assert_eq!(player.health, 0);
        assert!(player.eliminated);

        // a second hit within the cooldown window changes nothing
        spawn_at(&mut pool, Vec3::new(1.0, 0.0, 0.0), 1.05);
        assert!(resolver
            .resolve(&mut player, &Vec3::zeros(), &mut pool, 1.05)
            .is_none());
        assert_eq!(player.health, 0);
    }
}
