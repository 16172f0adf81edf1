//! Centroid seeding for the k-means engine
//!
//! First centroid uniformly at random, every further centroid via the
//! k-means++ weighted draw: candidates are weighted by the squared distance
//! to their nearest already-chosen centroid, so far-away points are favored.

use crate::error::{Error, Result};
use crate::random;
use crate::vector::{self, Point};
use ndarray::ArrayView1;
use rand::Rng;
use std::collections::BTreeMap;

/// Seed `n_clusters` centroids over a non-empty point set.
pub(crate) fn seed_centroids<K, R>(
    values: &BTreeMap<K, Point>,
    n_clusters: usize,
    rng: &mut R,
) -> Result<Vec<Point>>
where
    K: Ord,
    R: Rng + ?Sized,
{
    let first = rng.gen_range(0..values.len());
    let mut centroids = vec![values
        .values()
        .nth(first)
        .cloned()
        .ok_or_else(|| Error::computation_error("cannot seed centroids from an empty point set"))?];

    for _ in 1..n_clusters {
        let views: Vec<ArrayView1<'_, f64>> = centroids.iter().map(Point::view).collect();
        let next = next_centroid(values, &views, rng)?;
        centroids.push(next);
    }

    Ok(centroids)
}

/// Pick one more centroid via the k-means++ roulette draw.
///
/// Walks the points in ascending-id order: a point is selected once the
/// remaining draw weight drops to or below its squared distance to the
/// nearest existing centroid; otherwise that weight is consumed and the walk
/// continues. Falls through to the last point when floating-point rounding
/// leaves residual weight.
pub(crate) fn next_centroid<K, R>(
    values: &BTreeMap<K, Point>,
    centroids: &[ArrayView1<'_, f64>],
    rng: &mut R,
) -> Result<Point>
where
    K: Ord,
    R: Rng + ?Sized,
{
    let weights: Vec<f64> = values
        .values()
        .map(|point| nearest_squared_distance(point.view(), centroids))
        .collect();
    let total: f64 = weights.iter().sum();

    let mut draw = random::uniform(rng, 0.0, total);
    let mut selected = None;
    for (point, weight) in values.values().zip(&weights) {
        selected = Some(point);
        if draw <= *weight {
            break;
        }
        draw -= weight;
    }

    selected
        .cloned()
        .ok_or_else(|| Error::computation_error("cannot seed centroids from an empty point set"))
}

/// Squared distance from a point to its nearest centroid.
fn nearest_squared_distance(point: ArrayView1<'_, f64>, centroids: &[ArrayView1<'_, f64>]) -> f64 {
    centroids
        .iter()
        .map(|centroid| vector::squared_distance(point, *centroid))
        .fold(f64::INFINITY, f64::min)
}
