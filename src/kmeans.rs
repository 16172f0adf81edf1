//! K-means clustering engine over identifier-keyed point sets
//!
//! Lloyd's algorithm with k-means++ seeding. The engine owns its point set
//! for its whole lifetime and keeps the state of the last completed run;
//! every query reports `None` until a run has completed.

use crate::error::{Error, Result};
use crate::initialization;
use crate::vector::{self, Point};
use log::{debug, trace};
use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::Cell;
use std::collections::BTreeMap;

/// State of one completed `classify` run, swapped in whole once the run
/// finishes.
#[derive(Debug, Clone)]
pub(crate) struct Run<K> {
    /// Cluster members, indexed by cluster id, ascending by point id.
    pub(crate) clusters: Vec<Vec<K>>,
    /// Centroids, index-aligned with cluster ids.
    pub(crate) centroids: Vec<Point>,
    /// Iterations the run took.
    pub(crate) iterations: usize,
    /// Lazily computed average point-to-centroid distance.
    pub(crate) avg_distance: Cell<Option<f64>>,
}

/// K-means clustering engine.
///
/// Points are keyed by an arbitrary ordered identifier type; identifiers do
/// not need to be contiguous. The point set is fixed at construction and
/// never mutated by the engine.
///
/// # Example
///
/// ```
/// use kluster::KMeans;
/// use ndarray::array;
///
/// let mut kmeans = KMeans::new([
///     (42, array![0.0, 1.0]),
///     (50, array![0.2, 1.1]),
///     (7, array![9.0, 9.5]),
/// ])
/// .unwrap()
/// .random_state(42);
///
/// kmeans.classify(2, None).unwrap();
/// assert_eq!(kmeans.nb_clusters(), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct KMeans<K> {
    values: BTreeMap<K, Point>,
    dimensions: usize,
    rng: StdRng,
    run: Option<Run<K>>,
}

impl<K: Ord + Clone> KMeans<K> {
    /// Create an engine owning `values` as its universe of points.
    ///
    /// Fails when the collection is empty, contains a zero-dimension point,
    /// or mixes dimensions. When an identifier repeats, the later point wins.
    pub fn new<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Point)>,
    {
        let values: BTreeMap<K, Point> = values.into_iter().collect();
        if values.is_empty() {
            return Err(Error::invalid_data("Point set cannot be empty"));
        }

        let mut dimensions = 0;
        for point in values.values() {
            if dimensions == 0 {
                dimensions = point.len();
                if dimensions == 0 {
                    return Err(Error::invalid_data(
                        "Points must have at least one dimension",
                    ));
                }
            } else if point.len() != dimensions {
                return Err(Error::invalid_data("Points must all have the same dimension"));
            }
        }

        Ok(Self {
            values,
            dimensions,
            rng: StdRng::from_entropy(),
            run: None,
        })
    }

    /// Seed the internal random generator for reproducible runs.
    pub fn random_state(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Partition the point set into `n_clusters` clusters.
    ///
    /// Runs Lloyd's algorithm from a k-means++ seeding until the centroids
    /// stop moving, or until `max_iterations` when one is given. Returns
    /// `Ok(true)` on convergence, `Ok(false)` when the iteration cap cut the
    /// run short. Any previous run state is discarded up front, even when the
    /// arguments are rejected.
    pub fn classify(&mut self, n_clusters: usize, max_iterations: Option<usize>) -> Result<bool> {
        self.run = None;

        if n_clusters < 1 {
            return Err(Error::invalid_parameter(
                "Number of clusters must be at least 1",
            ));
        }
        if n_clusters > self.values.len() {
            return Err(Error::invalid_parameter(
                "Number of clusters cannot exceed the number of points",
            ));
        }

        let mut centroids =
            initialization::seed_centroids(&self.values, n_clusters, &mut self.rng)?;

        let mut iterations = 0;
        loop {
            iterations += 1;
            let clusters = self.fill_clusters(&centroids);
            let moved = self.move_centroids(&mut centroids, &clusters)?;
            trace!(
                "iteration {}: centroids {}",
                iterations,
                if moved { "moved" } else { "stable" }
            );

            let capped = max_iterations.map_or(false, |cap| iterations >= cap);
            if !moved || capped {
                debug!(
                    "classified {} points into {} clusters in {} iterations (converged: {})",
                    self.values.len(),
                    n_clusters,
                    iterations,
                    !moved
                );
                self.run = Some(Run {
                    clusters,
                    centroids,
                    iterations,
                    avg_distance: Cell::new(None),
                });
                return Ok(!moved);
            }
        }
    }

    /// Assign every point to its nearest centroid; the lowest cluster index
    /// wins ties. Membership follows point-id order.
    fn fill_clusters(&self, centroids: &[Point]) -> Vec<Vec<K>> {
        let mut clusters = vec![Vec::new(); centroids.len()];

        for (id, point) in &self.values {
            let mut closest = 0;
            let mut closest_distance = f64::INFINITY;
            for (cluster_id, centroid) in centroids.iter().enumerate() {
                let distance = vector::squared_distance(point.view(), centroid.view());
                if distance < closest_distance {
                    closest_distance = distance;
                    closest = cluster_id;
                }
            }
            clusters[closest].push(id.clone());
        }

        clusters
    }

    /// Move each centroid toward its cluster, in ascending cluster-id order.
    ///
    /// An empty cluster gets its centroid respawned immediately from a
    /// weighted draw against the remaining centroids. Non-empty clusters are
    /// recentered on their mean only while nothing has moved yet this pass;
    /// once something moved, later clusters keep their centroid until the
    /// next iteration. The final fixed point is unaffected.
    fn move_centroids(&mut self, centroids: &mut [Point], clusters: &[Vec<K>]) -> Result<bool> {
        let mut moved = false;

        for (cluster_id, members) in clusters.iter().enumerate() {
            if members.is_empty() {
                let respawned = {
                    let others: Vec<ArrayView1<'_, f64>> = centroids
                        .iter()
                        .enumerate()
                        .filter(|(id, _)| *id != cluster_id)
                        .map(|(_, centroid)| centroid.view())
                        .collect();
                    initialization::next_centroid(&self.values, &others, &mut self.rng)?
                };
                trace!("cluster {} is empty, respawning its centroid", cluster_id);
                centroids[cluster_id] = respawned;
                moved = true;
            } else if !moved {
                let points: Vec<ArrayView1<'_, f64>> =
                    members.iter().map(|id| self.values[id].view()).collect();
                let mean = vector::mean(&points)?;
                if vector::squared_distance(mean.view(), centroids[cluster_id].view()) != 0.0 {
                    centroids[cluster_id] = mean;
                    moved = true;
                }
            }
        }

        Ok(moved)
    }

    /// Number of clusters of the last completed run.
    pub fn nb_clusters(&self) -> Option<usize> {
        self.run.as_ref().map(|run| run.clusters.len())
    }

    /// Number of iterations the last completed run took.
    pub fn iterations(&self) -> Option<usize> {
        self.run.as_ref().map(|run| run.iterations)
    }

    /// Mean distance from each point to its assigned centroid.
    ///
    /// Computed on first access and cached until the next `classify` call.
    pub fn avg_distance_to_centroids(&self) -> Option<f64> {
        let run = self.run.as_ref()?;
        if let Some(cached) = run.avg_distance.get() {
            return Some(cached);
        }

        let mut total = 0.0;
        for (cluster_id, members) in run.clusters.iter().enumerate() {
            let centroid = &run.centroids[cluster_id];
            for id in members {
                total += vector::squared_distance(self.values[id].view(), centroid.view()).sqrt();
            }
        }
        let avg = total / self.values.len() as f64;

        run.avg_distance.set(Some(avg));
        Some(avg)
    }

    /// Cluster members of the last completed run, indexed by cluster id,
    /// ascending by point id within each cluster.
    pub fn clusters(&self) -> Option<&[Vec<K>]> {
        self.run.as_ref().map(|run| run.clusters.as_slice())
    }

    /// Centroids of the last completed run, index-aligned with cluster ids.
    pub fn centroids(&self) -> Option<&[Point]> {
        self.run.as_ref().map(|run| run.centroids.as_slice())
    }

    /// The points the engine was constructed with.
    pub fn values(&self) -> &BTreeMap<K, Point> {
        &self.values
    }

    /// Dimension shared by every point of the set.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub(crate) fn snapshot_run(&self) -> Option<Run<K>> {
        self.run.clone()
    }

    pub(crate) fn restore_run(&mut self, run: Run<K>) {
        self.run = Some(run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn three_points() -> KMeans<u32> {
        KMeans::new([
            (0, array![0.0, 1.0, 2.0]),
            (1, array![3.0, 4.0, 5.0]),
            (2, array![6.0, 7.0, 8.0]),
        ])
        .unwrap()
        .random_state(42)
    }

    #[test]
    fn test_empty_point_set() {
        let result = KMeans::<u32>::new([]);
        assert!(matches!(result, Err(Error::InvalidData { .. })));
    }

    #[test]
    fn test_mixed_dimensions() {
        let result = KMeans::new([(0, array![0.0, 1.0]), (1, array![0.0, 1.0, 2.0])]);
        assert!(matches!(result, Err(Error::InvalidData { .. })));
    }

    #[test]
    fn test_zero_dimension_point() {
        let result = KMeans::new([(0, Point::zeros(0))]);
        assert!(matches!(result, Err(Error::InvalidData { .. })));
    }

    #[test]
    fn test_duplicate_id_keeps_later_point() {
        let kmeans = KMeans::new([(0, array![0.0]), (0, array![5.0])]).unwrap();
        assert_eq!(kmeans.values()[&0], array![5.0]);
        assert_eq!(kmeans.values().len(), 1);
    }

    #[test]
    fn test_classify_zero_clusters() {
        let mut kmeans = three_points();
        let result = kmeans.classify(0, None);
        assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_classify_more_clusters_than_points() {
        let mut kmeans = three_points();
        let result = kmeans.classify(4, None);
        assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_failed_classify_resets_run_state() {
        let mut kmeans = three_points();
        kmeans.classify(2, None).unwrap();
        assert!(kmeans.nb_clusters().is_some());

        let _ = kmeans.classify(0, None);
        assert_eq!(kmeans.nb_clusters(), None);
        assert_eq!(kmeans.avg_distance_to_centroids(), None);
    }

    #[test]
    fn test_classify_single_cluster_centroid_is_mean() {
        let mut kmeans = three_points();
        let converged = kmeans.classify(1, None).unwrap();

        assert!(converged);
        assert_eq!(kmeans.nb_clusters(), Some(1));
        assert_eq!(kmeans.centroids().unwrap()[0], array![3.0, 4.0, 5.0]);
        assert_eq!(kmeans.clusters().unwrap()[0], vec![0, 1, 2]);
    }

    #[test]
    fn test_avg_distance_cached_value_is_stable() {
        let mut kmeans = three_points();
        kmeans.classify(1, None).unwrap();

        let first = kmeans.avg_distance_to_centroids().unwrap();
        let second = kmeans.avg_distance_to_centroids().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_iteration_cap() {
        let mut kmeans = KMeans::new(
            (0..20).map(|i| (i, array![f64::from(i % 4) * 50.0, f64::from(i / 4)])),
        )
        .unwrap()
        .random_state(3);

        kmeans.classify(3, Some(1)).unwrap();
        assert_eq!(kmeans.iterations(), Some(1));
    }

    #[test]
    fn test_same_seed_same_result() {
        let points: Vec<(u32, Point)> = (0..30)
            .map(|i| (i, array![f64::from(i % 5) * 20.0, f64::from(i % 7)]))
            .collect();

        let mut a = KMeans::new(points.clone()).unwrap().random_state(11);
        let mut b = KMeans::new(points).unwrap().random_state(11);
        a.classify(4, None).unwrap();
        b.classify(4, None).unwrap();

        assert_eq!(a.clusters(), b.clusters());
        assert_eq!(a.centroids(), b.centroids());
    }
}
