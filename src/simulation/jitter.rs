//! Random perturbation sources for simulated measurements
//!
//! Real probe-microphone readings never repeat exactly, so every simulated
//! point gets a small uniform offset. The source is injectable: the default
//! draws from OS entropy, tests plug in [`ZeroJitter`] or [`FixedJitter`]
//! for exact values, and [`UniformJitter::seeded`] gives reproducible runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces the per-point offset added to a simulated gain
pub trait JitterSource: Send {
    /// Offset in dB, within `[-amplitude, amplitude]`
    fn offset(&mut self, amplitude: f64) -> f64;
}

/// Uniformly distributed jitter
pub struct UniformJitter {
    rng: StdRng,
}

impl UniformJitter {
    /// Non-reproducible source seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible source with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for UniformJitter {
    fn default() -> Self {
        Self::new()
    }
}

impl JitterSource for UniformJitter {
    fn offset(&mut self, amplitude: f64) -> f64 {
        let amplitude = amplitude.abs();
        if amplitude == 0.0 || !amplitude.is_finite() {
            return 0.0;
        }
        self.rng.gen_range(-amplitude..=amplitude)
    }
}

/// Always returns zero
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroJitter;

impl JitterSource for ZeroJitter {
    fn offset(&mut self, _amplitude: f64) -> f64 {
        0.0
    }
}

/// Always returns the same offset, clamped to the requested amplitude
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn offset(&mut self, amplitude: f64) -> f64 {
        let amplitude = amplitude.abs();
        self.0.clamp(-amplitude, amplitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_jitter_stays_in_bounds() {
        let mut jitter = UniformJitter::new();
        for _ in 0..10_000 {
            let value = jitter.offset(2.5);
            assert!(
                (-2.5..=2.5).contains(&value),
                "jitter {} outside [-2.5, 2.5]",
                value
            );
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let mut a = UniformJitter::seeded(7);
        let mut b = UniformJitter::seeded(7);
        for _ in 0..32 {
            assert_eq!(a.offset(2.5), b.offset(2.5));
        }
    }

    #[test]
    fn test_uniform_jitter_varies() {
        let mut jitter = UniformJitter::seeded(99);
        let first = jitter.offset(2.5);
        let differs = (0..16).any(|_| jitter.offset(2.5) != first);
        assert!(differs, "uniform jitter should not be constant");
    }

    #[test]
    fn test_zero_amplitude_yields_zero() {
        let mut jitter = UniformJitter::seeded(1);
        assert_eq!(jitter.offset(0.0), 0.0);
    }

    #[test]
    fn test_fixed_jitter_clamps() {
        let mut jitter = FixedJitter(4.0);
        assert_eq!(jitter.offset(2.5), 2.5);
        let mut jitter = FixedJitter(-1.0);
        assert_eq!(jitter.offset(2.5), -1.0);
        assert_eq!(ZeroJitter.offset(2.5), 0.0);
    }
}
