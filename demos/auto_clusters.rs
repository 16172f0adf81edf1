//! Automatic cluster-count selection example
//!
//! Generates five noisy clumps along a line and lets the engine pick the
//! number of clusters itself. Run with `RUST_LOG=debug` to watch the elbow
//! scan settle.

use kluster::{random, KMeans, Point};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;

const POINTS: usize = 150;
const DIMENSIONS: usize = 8;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(1);

    // Every fifth point belongs to the same clump; clump centers sit 100
    // units apart with +-5 units of uniform noise on every coordinate.
    let points: Vec<(usize, Point)> = (0..POINTS)
        .map(|i| {
            let delta = ((i % 5) as f64 - 2.5) * 100.0;
            let coords: Vec<f64> = (0..DIMENSIONS)
                .map(|_| random::uniform(&mut rng, -5.0 + delta, 5.0 + delta))
                .collect();
            (i, Array1::from_vec(coords))
        })
        .collect();

    let mut kmeans = KMeans::new(points)?.random_state(42);

    let settled = kmeans.classify_and_optimize(None)?;

    println!("Elbow stabilized: {}", settled);
    println!("Clusters found: {:?}", kmeans.nb_clusters());
    println!(
        "Average distance to centroids: {:.4}",
        kmeans.avg_distance_to_centroids().unwrap_or(f64::NAN)
    );
    for (cluster_id, members) in kmeans.clusters().unwrap_or(&[]).iter().enumerate() {
        println!("  Cluster {}: {} points", cluster_id, members.len());
    }

    Ok(())
}
