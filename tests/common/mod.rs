//! Shared signal builders for the scenario tests

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rustytsa::PI2_MICRO;

/// `n` times spaced `dt` seconds apart, starting at zero.
pub fn uniform_times(n: usize, dt: f64) -> Vec<f64> {
    (0..n).map(|i| i as f64 * dt).collect()
}

/// Uniform spacing with reproducible jitter of up to ±30% of a step, so the
/// sampling is genuinely irregular but still monotonic.
pub fn jittered_times(n: usize, dt: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| i as f64 * dt + rng.random_range(-0.3 * dt..0.3 * dt))
        .collect()
}

/// `alpha*sin + beta*cos` at a cyclic frequency in microhertz.
pub fn tone(time: &[f64], freq_uhz: f64, alpha: f64, beta: f64) -> Vec<f64> {
    let omega = freq_uhz * PI2_MICRO;
    time.iter()
        .map(|&t| alpha * (omega * t).sin() + beta * (omega * t).cos())
        .collect()
}

/// Element-wise sum of two series.
pub fn add(x: &[f64], y: &[f64]) -> Vec<f64> {
    x.iter().zip(y).map(|(a, b)| a + b).collect()
}

/// Reproducible white Gaussian noise.
pub fn gaussian_noise(n: usize, sigma: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sigma).expect("valid sigma");
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

pub fn max_abs(x: &[f64]) -> f64 {
    x.iter().fold(0.0, |acc, v| acc.max(v.abs()))
}

pub fn rms(x: &[f64]) -> f64 {
    (x.iter().map(|v| v * v).sum::<f64>() / x.len() as f64).sqrt()
}
