//! Basic k-means clustering example
//!
//! Clusters a small two-dimensional dataset with a fixed number of clusters
//! and prints the resulting assignment.

use kluster::KMeans;
use ndarray::array;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Three loose groups of measurements, keyed by arbitrary sample ids.
    let mut kmeans = KMeans::new([
        (101, array![1.0, 1.2]),
        (102, array![0.8, 0.9]),
        (103, array![1.3, 1.0]),
        (205, array![8.1, 7.8]),
        (206, array![7.9, 8.3]),
        (207, array![8.4, 8.0]),
        (311, array![0.9, 8.1]),
        (312, array![1.2, 7.7]),
        (313, array![0.7, 8.4]),
    ])?
    .random_state(42);

    let converged = kmeans.classify(3, None)?;

    println!("Converged: {}", converged);
    println!("Iterations: {:?}", kmeans.iterations());
    println!(
        "Average distance to centroids: {:.4}",
        kmeans.avg_distance_to_centroids().unwrap_or(f64::NAN)
    );

    println!("Clusters:");
    for (cluster_id, members) in kmeans.clusters().unwrap_or(&[]).iter().enumerate() {
        println!("  Cluster {}: {:?}", cluster_id, members);
    }

    println!("Centroids:");
    for (cluster_id, centroid) in kmeans.centroids().unwrap_or(&[]).iter().enumerate() {
        println!("  Cluster {}: {:.2}", cluster_id, centroid);
    }

    Ok(())
}
