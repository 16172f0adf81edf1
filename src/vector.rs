//! Euclidean vector arithmetic over fixed-dimension points

use crate::error::{Error, Result};
use ndarray::{Array1, ArrayView1};

/// A fixed-dimension point in Euclidean space.
pub type Point = Array1<f64>;

/// Euclidean distance between two points of equal dimension.
pub fn distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::invalid_data("Points must have the same dimension"));
    }

    Ok(squared_distance(a, b).sqrt())
}

/// Euclidean length of a vector.
pub fn length(v: ArrayView1<f64>) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Elementwise sum of a non-empty list of points of equal dimension.
pub fn sum(points: &[ArrayView1<f64>]) -> Result<Point> {
    let first = points
        .first()
        .ok_or_else(|| Error::invalid_data("Cannot sum an empty list of points"))?;

    let mut total = first.to_owned();
    for point in &points[1..] {
        if point.len() != total.len() {
            return Err(Error::invalid_data("Points must have the same dimension"));
        }
        total += point;
    }

    Ok(total)
}

/// Divide every coordinate of a vector by a scalar.
///
/// The caller guarantees `n` is non-zero.
pub fn scalar_div(v: ArrayView1<f64>, n: f64) -> Point {
    v.mapv(|x| x / n)
}

/// Mean of a non-empty list of points of equal dimension.
pub fn mean(points: &[ArrayView1<f64>]) -> Result<Point> {
    let total = sum(points)?;
    Ok(scalar_div(total.view(), points.len() as f64))
}

/// Squared Euclidean distance, skipping the dimension check.
///
/// Hot-path variant for callers whose dimensions are validated up front.
pub(crate) fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_distance() {
        let cases = [
            (0.0, array![0.0, 0.0], array![0.0, 0.0]),
            (1.0, array![0.0, 0.0], array![0.0, 1.0]),
            (5.0, array![0.0, 0.0], array![3.0, 4.0]),
            (10.0, array![-3.0, -4.0], array![3.0, 4.0]),
        ];

        for (expected, a, b) in &cases {
            assert_eq!(distance(a.view(), b.view()).unwrap(), *expected);
        }
    }

    #[test]
    fn test_distance_dimension_mismatch() {
        let a = array![0.0, 0.0];
        let b = array![0.0, 0.0, 0.0];

        assert!(distance(a.view(), b.view()).is_err());
    }

    #[test]
    fn test_length() {
        assert_eq!(length(array![0.0, 0.0].view()), 0.0);
        assert_eq!(length(array![0.0, 1.0].view()), 1.0);
        assert_eq!(length(array![3.0, 4.0].view()), 5.0);
    }

    #[test]
    fn test_sum() {
        let points = [array![3.0, 4.0], array![5.0, 6.0], array![7.0, 8.0]];
        let views: Vec<_> = points.iter().map(|p| p.view()).collect();

        assert_eq!(sum(&views).unwrap(), array![15.0, 18.0]);
    }

    #[test]
    fn test_sum_empty() {
        assert!(sum(&[]).is_err());
    }

    #[test]
    fn test_sum_dimension_mismatch() {
        let a = array![0.0, 0.0];
        let b = array![0.0, 0.0, 0.0];

        assert!(sum(&[a.view(), b.view()]).is_err());
    }

    #[test]
    fn test_scalar_div() {
        assert_eq!(scalar_div(array![0.0, 0.0].view(), 5.0), array![0.0, 0.0]);
        assert_eq!(scalar_div(array![10.0, 5.0].view(), 5.0), array![2.0, 1.0]);
        assert_eq!(
            scalar_div(array![10.0, 5.0, 20.0].view(), 10.0),
            array![1.0, 0.5, 2.0]
        );
    }

    #[test]
    fn test_mean() {
        let points = [array![-1.0, -1.0], array![1.0, 1.0]];
        let views: Vec<_> = points.iter().map(|p| p.view()).collect();

        assert_eq!(mean(&views).unwrap(), array![0.0, 0.0]);

        let single = [array![4.0, 2.0]];
        let views: Vec<_> = single.iter().map(|p| p.view()).collect();
        assert_eq!(mean(&views).unwrap(), array![4.0, 2.0]);
    }

    #[test]
    fn test_squared_distance() {
        let a = array![0.0, 0.0];
        let b = array![3.0, 4.0];

        assert_eq!(squared_distance(a.view(), b.view()), 25.0);
    }
}
