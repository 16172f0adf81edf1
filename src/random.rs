//! Sampling primitives built on a caller-supplied random generator
//!
//! The engine never owns a global generator; every draw goes through a
//! `rand::Rng` handed in by the caller, so seeded runs stay reproducible.

use rand::Rng;
use std::f64::consts::PI;

/// Uniform draw in `[min, max)`.
///
/// Written as `min + U * (max - min)` so a zero-width range yields `min`
/// instead of panicking, which the weighted centroid draw relies on when
/// every candidate weight is zero.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + rng.gen::<f64>() * (max - min)
}

/// One normally-distributed draw via the Box-Muller transform.
///
/// Consumes two uniform draws and keeps only the cosine branch; the paired
/// sine output is not retained.
pub fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    (-2.0 * uniform(rng, 0.0, 1.0).ln()).sqrt()
        * (2.0 * PI * uniform(rng, 0.0, 1.0)).cos()
        * std_dev
        + mean
}
