use rand::Rng;
use std::time::{Duration, Instant};

use crate::constants::{SCREEN_WIDTH, SPAWN_RATE_STEP};
use crate::entities::Enemy;

/// Rate-limited enemy spawning.
///
/// A spawn needs both gates open: more than `interval` has passed since the
/// last spawn, and a uniform draw over `[1, spawn_rate]` comes up 1.
#[derive(Debug, Clone)]
pub struct Spawner {
    pub interval: Duration,
    pub spawn_rate: u32,
    base_rate: u32,
    min_rate: u32,
    last_spawn: Instant,
}

impl Spawner {
    pub fn new(interval: Duration, base_rate: u32, min_rate: u32, now: Instant) -> Self {
        let min_rate = min_rate.max(1);
        Self {
            interval,
            spawn_rate: base_rate.max(min_rate),
            base_rate,
            min_rate,
            last_spawn: now,
        }
    }

    /// Spawn rate for a level: `base - 2 * level`, never below the minimum
    pub fn rate_for_level(&self, level: u32) -> u32 {
        self.base_rate
            .saturating_sub(SPAWN_RATE_STEP.saturating_mul(level))
            .max(self.min_rate)
    }

    pub fn set_level(&mut self, level: u32) {
        self.spawn_rate = self.rate_for_level(level);
    }

    /// Back to the base rate with a fresh time gate
    pub fn reset(&mut self, now: Instant) {
        self.spawn_rate = self.base_rate.max(self.min_rate);
        self.last_spawn = now;
    }

    pub fn try_spawn(&mut self, now: Instant, rng: &mut impl Rng) -> Option<Enemy> {
        if now.saturating_duration_since(self.last_spawn) <= self.interval {
            return None;
        }
        if rng.random_range(1..=self.spawn_rate) != 1 {
            return None;
        }

        self.last_spawn = now;
        let x = rng.random_range(0..=SCREEN_WIDTH - Enemy::WIDTH);
        Some(Enemy::new(x, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_rate_for_level() {
        let spawner = Spawner::new(Duration::from_millis(1000), 30, 10, Instant::now());
        assert_eq!(spawner.spawn_rate, 30);
        assert_eq!(spawner.rate_for_level(1), 28);
        assert_eq!(spawner.rate_for_level(2), 26);
        assert_eq!(spawner.rate_for_level(10), 10);
        assert_eq!(spawner.rate_for_level(11), 10);
        assert_eq!(spawner.rate_for_level(1000), 10);
    }

    #[test]
    fn test_time_gate_blocks_early_spawns() {
        let start = Instant::now();
        let mut spawner = Spawner::new(Duration::from_millis(1000), 1, 1, start);
        let mut rng = seeded_rng();

        assert!(spawner.try_spawn(start, &mut rng).is_none());
        assert!(
            spawner
                .try_spawn(start + Duration::from_millis(1000), &mut rng)
                .is_none()
        );
    }

    #[test]
    fn test_spawns_once_gate_opens() {
        let start = Instant::now();
        let mut spawner = Spawner::new(Duration::from_millis(1000), 1, 1, start);
        let mut rng = seeded_rng();

        let later = start + Duration::from_millis(1001);
        let enemy = spawner.try_spawn(later, &mut rng).unwrap();
        assert_eq!(enemy.y, 0);
        assert!(enemy.x >= 0 && enemy.x <= SCREEN_WIDTH - Enemy::WIDTH);

        // The time gate restarts from the successful spawn
        assert!(spawner.try_spawn(later, &mut rng).is_none());
        assert!(
            spawner
                .try_spawn(later + Duration::from_millis(1001), &mut rng)
                .is_some()
        );
    }

    #[test]
    fn test_probability_gate_thins_spawns() {
        let start = Instant::now();
        let mut spawner = Spawner::new(Duration::from_millis(1000), 30, 10, start);
        let mut rng = seeded_rng();

        // Time gate stays open; only the draw decides
        let mut spawned = 0;
        let mut now = start;
        for _ in 0..3000 {
            now += Duration::from_millis(1001);
            if spawner.try_spawn(now, &mut rng).is_some() {
                spawned += 1;
            }
        }
        assert!(spawned > 30, "spawned {spawned}");
        assert!(spawned < 200, "spawned {spawned}");
    }

    #[test]
    fn test_reset_restores_base_rate() {
        let start = Instant::now();
        let mut spawner = Spawner::new(Duration::from_millis(1000), 30, 10, start);
        spawner.set_level(5);
        assert_eq!(spawner.spawn_rate, 20);
        spawner.reset(start);
        assert_eq!(spawner.spawn_rate, 30);
    }
}
