//! Asteroid object pool
//!
//! Pre-allocated slots for asteroids so steady-state play never allocates
//! per frame. Handles are index + generation pairs; a stale handle (slot
//! recycled since the handle was issued) simply resolves to `None`.
//!
//! Growth policy: prefer a free slot; otherwise grow by a fixed factor
//! (with a minimum step) while below the hard ceiling; at the ceiling,
//! recycle the oldest active asteroid instead of failing. `acquire` never
//! returns an error under normal operation.

use crate::config::PoolConfig;
use crate::entity::Asteroid;
use std::collections::VecDeque;

/// Handle for a pooled asteroid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AsteroidHandle {
    /// Index in the slot vector
    pub index: u32,
    /// Generation counter for stale-handle detection
    pub generation: u32,
}

/// One pool slot
struct Slot {
    asteroid: Asteroid,
    generation: u32,
}

/// Statistics for pool usage
#[derive(Debug, Default, Clone)]
pub struct PoolStats {
    /// Number of asteroids currently active
    pub active: usize,
    /// Maximum simultaneously active asteroids seen
    pub peak_active: usize,
    /// Number of growth events since creation
    pub growth_events: usize,
    /// Number of ceiling recycles since creation
    pub recycles: usize,
}

/// Fixed-capacity-with-growth asteroid pool
pub struct AsteroidPool {
    slots: Vec<Slot>,
    free_list: VecDeque<u32>,
    config: PoolConfig,
    stats: PoolStats,
}

impl AsteroidPool {
    /// Create a pool with `config.initial_size` free slots.
    ///
    /// The config is sanitized on the way in: the ceiling is at least one
    /// slot and growth adds at least one slot, so a hand-edited config
    /// file can never produce a pool that cannot satisfy `acquire`.
    pub fn new(mut config: PoolConfig) -> Self {
        config.ceiling = config.ceiling.max(1);
        config.min_growth = config.min_growth.max(1);
        let initial = config.initial_size.min(config.ceiling);
        let mut slots = Vec::with_capacity(initial);
        let mut free_list = VecDeque::with_capacity(initial);

        for index in 0..initial {
            slots.push(Slot {
                asteroid: Asteroid::default(),
                generation: 0,
            });
            free_list.push_back(index as u32);
        }

        log::debug!("created AsteroidPool with {initial} slots (ceiling {})", config.ceiling);

        Self {
            slots,
            free_list,
            config,
            stats: PoolStats::default(),
        }
    }

    /// Acquire a slot, marking it active and stamping `spawned_at = now`.
    ///
    /// Never fails: grows below the ceiling, recycles the oldest active
    /// asteroid at the ceiling.
    pub fn acquire(&mut self, now: f64) -> AsteroidHandle {
        if self.free_list.is_empty() && self.slots.len() < self.config.ceiling {
            self.grow();
        }

        let handle = if let Some(index) = self.free_list.pop_front() {
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            AsteroidHandle {
                index,
                generation: slot.generation,
            }
        } else {
            self.recycle_oldest()
        };

        let slot = &mut self.slots[handle.index as usize];
        slot.asteroid.clear();
        slot.asteroid.active = true;
        slot.asteroid.spawned_at = now;

        self.stats.active += 1;
        self.stats.peak_active = self.stats.peak_active.max(self.stats.active);

        handle
    }

    /// Release a slot back to the free list, clearing behavioral flags
    pub fn release(&mut self, handle: AsteroidHandle) -> Result<(), &'static str> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .ok_or("handle index out of range")?;

        if slot.generation != handle.generation || !slot.asteroid.active {
            return Err("handle is stale or slot not active");
        }

        slot.asteroid.clear();
        self.free_list.push_back(handle.index);
        self.stats.active = self.stats.active.saturating_sub(1);

        Ok(())
    }

    /// Get an asteroid by handle, `None` if the handle is stale
    pub fn get(&self, handle: AsteroidHandle) -> Option<&Asteroid> {
        let slot = self.slots.get(handle.index as usize)?;
        (slot.generation == handle.generation && slot.asteroid.active).then(|| &slot.asteroid)
    }

    /// Get a mutable asteroid by handle, `None` if the handle is stale
    pub fn get_mut(&mut self, handle: AsteroidHandle) -> Option<&mut Asteroid> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        (slot.generation == handle.generation && slot.asteroid.active)
            .then(move || &mut slot.asteroid)
    }

    /// Iterate active asteroids with their handles
    pub fn iter_active(&self) -> impl Iterator<Item = (AsteroidHandle, &Asteroid)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.asteroid.active.then(|| {
                (
                    AsteroidHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    &slot.asteroid,
                )
            })
        })
    }

    /// Handles of all active asteroids (snapshot, safe to mutate during)
    pub fn active_handles(&self) -> Vec<AsteroidHandle> {
        self.iter_active().map(|(handle, _)| handle).collect()
    }

    /// Number of currently active asteroids
    pub fn active_count(&self) -> usize {
        self.stats.active
    }

    /// Total slot count (active + free)
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Usage statistics
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Release every active asteroid (session reset)
    pub fn clear(&mut self) {
        for handle in self.active_handles() {
            // handles from active_handles are never stale
            let _ = self.release(handle);
        }
    }

    fn grow(&mut self) {
        let step = ((self.slots.len() as f32 * self.config.growth_factor) as usize)
            .max(self.config.min_growth);
        let target = (self.slots.len() + step).min(self.config.ceiling);

        for index in self.slots.len()..target {
            self.slots.push(Slot {
                asteroid: Asteroid::default(),
                generation: 0,
            });
            self.free_list.push_back(index as u32);
        }

        self.stats.growth_events += 1;
        log::debug!("pool grew to {} slots", self.slots.len());
    }

    /// Steal the oldest active slot by `spawned_at`. Only called when the
    /// free list is empty and the pool is at its ceiling, which means at
    /// least one slot is active.
    fn recycle_oldest(&mut self) -> AsteroidHandle {
        let mut oldest: Option<(u32, f64)> = None;
        for (index, slot) in self.slots.iter().enumerate() {
            if !slot.asteroid.active {
                continue;
            }
            let at = slot.asteroid.spawned_at;
            if oldest.map_or(true, |(_, best)| at < best) {
                oldest = Some((index as u32, at));
            }
        }

        // free list empty + all slots accounted for => some slot is active
        let (index, _) = oldest.unwrap_or((0, 0.0));
        let slot = &mut self.slots[index as usize];
        slot.asteroid.clear();
        slot.generation += 1;

        self.stats.active = self.stats.active.saturating_sub(1);
        self.stats.recycles += 1;
        log::debug!("pool at ceiling; recycled slot {index}");

        AsteroidHandle {
            index,
            generation: slot.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_pool(initial: usize, ceiling: usize) -> AsteroidPool {
        AsteroidPool::new(PoolConfig {
            initial_size: initial,
            ceiling,
            growth_factor: 0.2,
            min_growth: 2,
        })
    }

    #[test]
    fn acquire_release_round_trip() {
        let mut pool = small_pool(4, 8);
        let handle = pool.acquire(1.0);
        assert_eq!(pool.active_count(), 1);
        assert!(pool.get(handle).is_some());

        pool.release(handle).unwrap();
        assert_eq!(pool.active_count(), 0);
        assert!(pool.get(handle).is_none());
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut pool = small_pool(1, 8);
        let first = pool.acquire(1.0);
        pool.release(first).unwrap();
        let second = pool.acquire(2.0);

        assert!(pool.get(first).is_none());
        assert!(pool.get(second).is_some());
        assert!(pool.release(first).is_err());
    }

    #[test]
    fn grows_below_ceiling() {
        let mut pool = small_pool(2, 16);
        for i in 0..6 {
            pool.acquire(f64::from(i));
        }
        assert_eq!(pool.active_count(), 6);
        assert!(pool.capacity() >= 6);
        assert!(pool.capacity() <= 16);
        assert!(pool.stats().growth_events >= 1);
    }

    #[test]
    fn ceiling_recycles_oldest_active() {
        let mut pool = small_pool(3, 3);
        let oldest = pool.acquire(1.0);
        let _middle = pool.acquire(2.0);
        let _newest = pool.acquire(3.0);
        assert_eq!(pool.capacity(), 3);

        let recycled = pool.acquire(4.0);
        assert_eq!(pool.active_count(), 3);
        assert_eq!(recycled.index, oldest.index);
        assert!(pool.get(oldest).is_none());
        // the reused slot carries the new creation time
        assert_eq!(pool.get(recycled).unwrap().spawned_at, 4.0);
        assert_eq!(pool.stats().recycles, 1);
    }

    #[test]
    fn active_flag_agrees_with_free_list() {
        let mut pool = small_pool(4, 8);
        let a = pool.acquire(1.0);
        let b = pool.acquire(2.0);
        pool.release(a).unwrap();

        // every slot is exactly one of: active, or reachable via a fresh acquire
        let active: Vec<u32> = pool.iter_active().map(|(h, _)| h.index).collect();
        assert_eq!(active, vec![b.index]);

        let mut seen_free = Vec::new();
        for _ in 0..pool.capacity() - 1 {
            seen_free.push(pool.acquire(3.0).index);
        }
        assert!(!seen_free.contains(&b.index));
        assert!(seen_free.contains(&a.index));
    }

    #[test]
    fn zeroed_config_is_clamped_to_a_working_pool() {
        let mut pool = AsteroidPool::new(PoolConfig {
            initial_size: 0,
            ceiling: 0,
            growth_factor: 0.0,
            min_growth: 0,
        });

        let first = pool.acquire(1.0);
        assert!(pool.get(first).is_some());

        // at the clamped one-slot ceiling, acquire recycles instead of
        // panicking on an empty slot vector
        let second = pool.acquire(2.0);
        assert!(pool.get(second).is_some());
        assert!(pool.get(first).is_none());
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn clear_releases_everything() {
        let mut pool = small_pool(4, 8);
        for i in 0..4 {
            pool.acquire(f64::from(i));
        }
        pool.clear();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.iter_active().count(), 0);
    }
}
