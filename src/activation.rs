//! Stateless scalar activation functions
//!
//! Pure scalar-to-scalar helpers with no state; the clustering engine does
//! not call them.

/// Identity: returns the value unchanged.
pub fn identity(val: f64) -> f64 {
    val
}

/// Binary step: 1 at and above zero, 0 below.
pub fn binary_step(val: f64) -> f64 {
    if val >= 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Logistic sigmoid, `1 / (1 + e^-x)`.
pub fn sigmoid(val: f64) -> f64 {
    1.0 / (1.0 + (-val).exp())
}

/// Hyperbolic tangent.
pub fn tanh(val: f64) -> f64 {
    val.tanh()
}

/// Rectified linear unit: the value at and above zero, 0 below.
pub fn relu(val: f64) -> f64 {
    if val >= 0.0 {
        val
    } else {
        0.0
    }
}

/// Leaky rectified linear unit with a 0.01 slope below zero.
pub fn leaky_relu(val: f64) -> f64 {
    if val >= 0.0 {
        val
    } else {
        0.01 * val
    }
}

/// Gaussian bump, `e^(-x^2)`.
pub fn gaussian(val: f64) -> f64 {
    (-val * val).exp()
}
