//! Decorative comet pool.
//!
//! A bounded set of short-lived streaks around the globe. Spawn and expiry
//! are scheduled as absolute times drawn from a seeded RNG against the
//! injected frame clock, so behavior is deterministic and testable without
//! real delays.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Pool never grows beyond this many live comets.
pub const MAX_COMETS: usize = 6;

const MIN_LIFETIME: f64 = 2.0;
const MAX_LIFETIME: f64 = 6.0;
const MIN_SPAWN_INTERVAL: f64 = 0.8;
const MAX_SPAWN_INTERVAL: f64 = 3.5;

#[derive(Clone, Copy, Debug)]
pub struct Comet {
    /// Geographic degrees, same convention as events.
    pub longitude: f64,
    pub latitude: f64,
    /// Travel heading in radians, for the streak direction.
    pub heading: f64,
    spawned_at: f64,
    expires_at: f64,
}

impl Comet {
    /// 0 at spawn, 1 at expiry.
    pub fn age_fraction(&self, now: f64) -> f64 {
        let life = self.expires_at - self.spawned_at;
        ((now - self.spawned_at) / life).clamp(0.0, 1.0)
    }
}

pub struct AmbientPool {
    comets: Vec<Comet>,
    next_spawn_at: f64,
    rng: ChaCha8Rng,
}

impl AmbientPool {
    pub fn new(seed: u64) -> Self {
        AmbientPool {
            comets: Vec::new(),
            next_spawn_at: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Expire old comets, spawn a new one when due and under the cap.
    pub fn tick(&mut self, now: f64) {
        self.comets.retain(|comet| comet.expires_at > now);

        if now >= self.next_spawn_at {
            if self.comets.len() < MAX_COMETS {
                let lifetime = self.rng.gen_range(MIN_LIFETIME..MAX_LIFETIME);
                self.comets.push(Comet {
                    longitude: self.rng.gen_range(-180.0..180.0),
                    latitude: self.rng.gen_range(-70.0..70.0),
                    heading: self.rng.gen_range(0.0..std::f64::consts::TAU),
                    spawned_at: now,
                    expires_at: now + lifetime,
                });
            }
            self.next_spawn_at =
                now + self.rng.gen_range(MIN_SPAWN_INTERVAL..MAX_SPAWN_INTERVAL);
        }
    }

    /// Teardown/full reset: drop all live comets and pending spawn work.
    pub fn clear(&mut self) {
        self.comets.clear();
        self.next_spawn_at = f64::MAX;
    }

    pub fn comets(&self) -> &[Comet] {
        &self.comets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_stays_bounded() {
        let mut pool = AmbientPool::new(7);
        let mut now = 0.0;
        for _ in 0..500 {
            pool.tick(now);
            assert!(pool.comets().len() <= MAX_COMETS);
            now += 0.1;
        }
    }

    #[test]
    fn test_comets_expire() {
        let mut pool = AmbientPool::new(7);
        pool.tick(0.0);
        assert_eq!(pool.comets().len(), 1);
        // Spawning continues, so check the original comet specifically.
        let expiry = pool.comets()[0].expires_at;
        pool.tick(expiry + 0.01);
        assert!(pool
            .comets()
            .iter()
            .all(|c| (c.expires_at - expiry).abs() > 1e-9));
    }

    #[test]
    fn test_deterministic_for_seed() {
        let mut a = AmbientPool::new(42);
        let mut b = AmbientPool::new(42);
        for step in 0..100 {
            let now = step as f64 * 0.25;
            a.tick(now);
            b.tick(now);
        }
        assert_eq!(a.comets().len(), b.comets().len());
        for (x, y) in a.comets().iter().zip(b.comets()) {
            assert_eq!(x.longitude, y.longitude);
            assert_eq!(x.spawned_at, y.spawned_at);
        }
    }

    #[test]
    fn test_clear_stops_all_work() {
        let mut pool = AmbientPool::new(1);
        pool.tick(0.0);
        pool.clear();
        assert!(pool.comets().is_empty());
        // No respawn after teardown.
        for step in 1..100 {
            pool.tick(step as f64);
        }
        assert!(pool.comets().is_empty());
    }

    #[test]
    fn test_age_fraction_clamped() {
        let comet = Comet {
            longitude: 0.0,
            latitude: 0.0,
            heading: 0.0,
            spawned_at: 10.0,
            expires_at: 14.0,
        };
        assert_eq!(comet.age_fraction(9.0), 0.0);
        assert!((comet.age_fraction(12.0) - 0.5).abs() < 1e-9);
        assert_eq!(comet.age_fraction(99.0), 1.0);
    }
}
