//! Automatic cluster-count selection
//!
//! Scans increasing cluster counts, watching the average-distance curve for
//! its elbow: the recorded count furthest from the line joining the first
//! and the latest run. The scan stops once the same candidate keeps winning
//! long enough, instead of exhausting every possible count.

use crate::error::{Error, Result};
use crate::kmeans::{KMeans, Run};
use log::debug;
use std::collections::BTreeMap;
use std::f64::consts::E;

/// One recorded run of the scan.
struct RunRecord<K> {
    avg_distance: f64,
    run: Run<K>,
}

/// Perpendicular distance from the curve point for cluster count `k` to the
/// reference line joining the curve points for counts `first_k` and `last_k`.
///
/// Works in a frame where the first count sits at x = 0 (perpendicular
/// distance is translation-invariant), which is what the `C = -y1` intercept
/// of the line formula presumes.
fn elbow_distance(k: usize, avg: f64, first_k: usize, first_avg: f64, last_k: usize, last_avg: f64) -> f64 {
    let x = (k - first_k) as f64;
    let x2 = (last_k - first_k) as f64;
    let a = -(last_avg - first_avg) / x2;
    let b = 1.0;
    let c = -first_avg;
    (a * x + b * avg + c).abs() / (a * a + b * b).sqrt()
}

impl<K: Ord + Clone> KMeans<K> {
    /// Classify with an automatically selected number of clusters.
    ///
    /// Runs `classify` for one cluster, then for increasing counts, keeping a
    /// rolling log of every run. After each run the elbow candidate is
    /// re-evaluated; once the same candidate has won `ceil(tried / e)`
    /// consecutive evaluations, its recorded run is restored and the scan
    /// stops. Counts below the candidate are dropped from the log as they can
    /// no longer become the answer.
    ///
    /// Returns `Ok(true)` when a candidate stabilized (or every point is
    /// identical, which makes one cluster final), `Ok(false)` when the scan
    /// exhausted the candidate range first. Errors from `classify` propagate
    /// unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use kluster::KMeans;
    /// use ndarray::array;
    ///
    /// let mut kmeans = KMeans::new([
    ///     (0, array![0.0, 1.0]),
    ///     (1, array![0.0, 1.0]),
    ///     (2, array![0.0, 1.0]),
    /// ])
    /// .unwrap()
    /// .random_state(42);
    ///
    /// assert!(kmeans.classify_and_optimize(None).unwrap());
    /// assert_eq!(kmeans.nb_clusters(), Some(1));
    /// ```
    pub fn classify_and_optimize(&mut self, max_iterations: Option<usize>) -> Result<bool> {
        let nb_values = self.values().len();

        self.classify(1, max_iterations)?;
        let first_avg = self
            .avg_distance_to_centroids()
            .ok_or_else(no_run_state)?;
        if first_avg == 0.0 {
            debug!("every point coincides, accepting a single cluster");
            return Ok(true);
        }

        let min_tried = 4.min(nb_values);
        let mut runs: BTreeMap<usize, RunRecord<K>> = BTreeMap::new();
        runs.insert(1, self.record()?);
        let mut tried = 1_usize;
        let mut best_nb: Option<usize> = None;
        let mut stability = 0_usize;

        for nb_clusters in 2..nb_values {
            self.classify(nb_clusters, max_iterations)?;
            let record = self.record()?;
            let last_avg = record.avg_distance;
            runs.insert(nb_clusters, record);
            tried += 1;

            // The elbow is meaningless until the curve has enough points.
            if tried < min_tried {
                continue;
            }

            let mut candidate = nb_clusters;
            let mut candidate_distance = f64::NEG_INFINITY;
            for (&k, rec) in runs.range(..nb_clusters) {
                let distance =
                    elbow_distance(k, rec.avg_distance, 1, first_avg, nb_clusters, last_avg);
                // >= so a later count overtakes an equally distant earlier one.
                if distance >= candidate_distance {
                    candidate_distance = distance;
                    candidate = k;
                }
            }

            if best_nb == Some(candidate) {
                stability += 1;
                let threshold = (tried as f64 / E).ceil() as usize;
                debug!(
                    "elbow candidate {} held ({} of {} needed)",
                    candidate, stability, threshold
                );
                if stability >= threshold {
                    let record = runs.remove(&candidate).ok_or_else(no_run_state)?;
                    self.restore_run(record.run);
                    debug!("settled on {} clusters after trying {} counts", candidate, tried);
                    return Ok(true);
                }
            } else {
                debug!("elbow candidate moved to {} (was {:?})", candidate, best_nb);
                runs.retain(|&k, _| k >= candidate);
                best_nb = Some(candidate);
                stability = 0;
            }
        }

        // Candidate range exhausted before the elbow stabilized; fall back to
        // the best candidate seen, when there was one.
        if let Some(best) = best_nb {
            if let Some(record) = runs.remove(&best) {
                self.restore_run(record.run);
            }
        }
        Ok(false)
    }

    fn record(&self) -> Result<RunRecord<K>> {
        let avg_distance = self
            .avg_distance_to_centroids()
            .ok_or_else(no_run_state)?;
        let run = self.snapshot_run().ok_or_else(no_run_state)?;
        Ok(RunRecord { avg_distance, run })
    }
}

fn no_run_state() -> Error {
    Error::computation_error("classification left no run state")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elbow_distance_endpoints_on_line() {
        // Both reference points lie on the line itself.
        assert_eq!(elbow_distance(1, 10.0, 1, 10.0, 5, 2.0), 0.0);
        assert_eq!(elbow_distance(5, 2.0, 1, 10.0, 5, 2.0), 0.0);
    }

    #[test]
    fn test_elbow_distance_below_the_line() {
        // Halfway along a line dropping from 10 to 2, the line sits at 6;
        // a point at 1 is 5 below, scaled by the line's slope.
        let distance = elbow_distance(3, 1.0, 1, 10.0, 5, 2.0);
        let slope = (2.0_f64 - 10.0) / 4.0;
        let expected = 5.0 / (slope * slope + 1.0).sqrt();
        assert!((distance - expected).abs() < 1e-12);
    }

    #[test]
    fn test_elbow_distance_flat_curve() {
        // A flat reference line degrades to plain vertical distance.
        assert_eq!(elbow_distance(3, 4.0, 1, 10.0, 5, 10.0), 6.0);
    }
}
