use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::Rng;

/// Source of the small random component added to heuristic confidences.
///
/// Implementations return a value in `[0, 1)`.
pub trait JitterSource: Send + Sync {
    fn jitter(&self, normalized: &str) -> f64;
}

/// Uniform noise from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn jitter(&self, _normalized: &str) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Same input, same jitter.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashedJitter;

impl JitterSource for HashedJitter {
    fn jitter(&self, normalized: &str) -> f64 {
        let mut hasher = DefaultHasher::new();
        normalized.hash(&mut hasher);
        // top 53 bits fit an f64 mantissa exactly
        (hasher.finish() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn jitter(&self, _normalized: &str) -> f64 {
        self.0
    }
}
