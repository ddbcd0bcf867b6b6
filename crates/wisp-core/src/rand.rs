//! Lightweight xorshift32 PRNG and the sampling helpers built on it

use crate::error::{Result, WispError};
use crate::types::Vec2;
use std::time::{SystemTime, UNIX_EPOCH};

pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Seed from the wall clock. Runs are not expected to be reproducible.
    pub fn from_clock() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32).rotate_left(16))
            .unwrap_or(0xDEAD_BEEF);
        Self::new(seed)
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        // 24 bits keeps the result exactly representable and strictly below 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns an index uniformly in [0, n). `n` must be non-zero.
    fn index_below(&mut self, n: usize) -> usize {
        ((self.next_u32() as u64 * n as u64) >> 32) as usize
    }

    /// One normal sample via the Box-Muller transform. The paired sample is discarded.
    pub fn gaussian(&mut self, mean: f32, std_dev: f32) -> f32 {
        // u1 in (0, 1] so ln(u1) stays finite
        let u1 = 1.0 - self.next_f32();
        let u2 = self.next_f32();
        let z0 = (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos();
        z0 * std_dev + mean
    }

    /// Integer uniformly in the closed interval `[ceil(min), floor(max)]`.
    /// An empty interval collapses to `ceil(min)`.
    pub fn uniform_int(&mut self, min: f32, max: f32) -> i64 {
        let lo = min.ceil() as i64;
        let hi = max.floor() as i64;
        if hi <= lo {
            return lo;
        }
        lo + self.index_below((hi - lo + 1) as usize) as i64
    }

    /// Uniformly random element of `items`
    pub fn choose_one<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T> {
        if items.is_empty() {
            return Err(WispError::EmptyCollection);
        }
        Ok(&items[self.index_below(items.len())])
    }

    /// `n` distinct elements of `items` in random order (partial Fisher-Yates on a copy).
    pub fn sample_without_replacement<T: Clone>(&mut self, items: &[T], n: usize) -> Result<Vec<T>> {
        if n > items.len() {
            return Err(WispError::InsufficientPopulation {
                requested: n,
                available: items.len(),
            });
        }

        let mut copy = items.to_vec();
        for i in 0..n {
            let j = i + self.index_below(copy.len() - i);
            copy.swap(i, j);
        }
        copy.truncate(n);
        Ok(copy)
    }

    /// Unit vector with a uniformly random heading
    pub fn random_direction(&mut self) -> Vec2 {
        Vec2::from_angle(self.range(0.0, std::f32::consts::TAU))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rng_range_bounds() {
        let mut rng = ParticleRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(0.0, 10.0);
            assert!(v >= 0.0 && v < 10.0);
        }
    }

    #[test]
    fn gaussian_moments_converge() {
        let mut rng = ParticleRng::new(7);
        let n = 200_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.gaussian(5.0, 2.0) as f64).collect();

        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;

        assert!((mean - 5.0).abs() < 0.05, "mean was {mean}");
        assert!((var.sqrt() - 2.0).abs() < 0.05, "std dev was {}", var.sqrt());
    }

    #[test]
    fn gaussian_zero_deviation_is_mean() {
        let mut rng = ParticleRng::new(3);
        for _ in 0..100 {
            assert_eq!(rng.gaussian(1.5, 0.0), 1.5);
        }
    }

    #[test]
    fn uniform_int_closed_interval() {
        let mut rng = ParticleRng::new(11);
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            let v = rng.uniform_int(0.2, 4.9);
            assert!((1..=4).contains(&v));
            seen.insert(v);
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn uniform_int_degenerate_interval() {
        let mut rng = ParticleRng::new(11);
        assert_eq!(rng.uniform_int(3.0, 3.0), 3);
    }

    #[test]
    fn choose_one_empty_fails() {
        let mut rng = ParticleRng::new(1);
        let empty: [u8; 0] = [];
        assert!(matches!(
            rng.choose_one(&empty),
            Err(WispError::EmptyCollection)
        ));
    }

    #[test]
    fn choose_one_single_element() {
        let mut rng = ParticleRng::new(1);
        for _ in 0..50 {
            assert_eq!(*rng.choose_one(&["only"]).unwrap(), "only");
        }
    }

    #[test]
    fn sample_without_replacement_distinct_members() {
        let mut rng = ParticleRng::new(99);
        let items: Vec<u32> = (0..50).collect();
        let original = items.clone();

        for n in [0, 1, 10, 49, 50] {
            let picked = rng.sample_without_replacement(&items, n).unwrap();
            assert_eq!(picked.len(), n);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), n);
            assert!(picked.iter().all(|p| items.contains(p)));
        }

        assert_eq!(items, original);
    }

    #[test]
    fn sample_without_replacement_too_many() {
        let mut rng = ParticleRng::new(5);
        let items = [1, 2, 3];
        match rng.sample_without_replacement(&items, 4) {
            Err(WispError::InsufficientPopulation {
                requested,
                available,
            }) => {
                assert_eq!(requested, 4);
                assert_eq!(available, 3);
            }
            other => panic!("Expected InsufficientPopulation, got {other:?}"),
        }
    }

    #[test]
    fn random_direction_unit_length() {
        let mut rng = ParticleRng::new(123);
        for _ in 0..100 {
            assert!((rng.random_direction().length() - 1.0).abs() < 1e-5);
        }
    }
}
