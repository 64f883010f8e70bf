//! Distance functions for vector similarity.
//!
//! All metrics are distances: lower = more similar.
//! - **Euclidean**: sqrt(sum((a[i] - b[i])^2))
//! - **Cosine**: 1 - (a · b) / (||a|| * ||b||), 1 when either norm is 0
//! - **Dot**: -(a · b)

use memory_types::Metric;

use crate::error::VectorError;

/// Compute the distance between two vectors under `metric`.
///
/// Fails with `DimensionMismatch` when the lengths differ.
pub fn distance(metric: Metric, a: &[f32], b: &[f32]) -> Result<f32, VectorError> {
    if a.len() != b.len() {
        return Err(VectorError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(raw_distance(metric, a, b))
}

/// Unchecked distance for vectors already validated against the index dimension.
#[inline]
pub(crate) fn raw_distance(metric: Metric, a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    match metric {
        Metric::Euclidean => euclidean_distance(a, b),
        Metric::Cosine => cosine_distance(a, b),
        Metric::Dot => -dot_product(a, b),
    }
}

/// Euclidean (L2) distance.
#[inline]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

/// Cosine distance.
#[inline]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Inner product.
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
