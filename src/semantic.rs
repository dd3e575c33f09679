//! Embedding vectors and the cosine-similarity scorer behind guess evaluation.

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// A non-empty, finite embedding returned by an embedding provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    /// Wrap raw provider output.
    ///
    /// Fails with [`Error::InvalidInput`] when `values` is empty or holds a
    /// NaN/infinite component.
    pub fn new(values: Vec<f32>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::InvalidInput(
                "embedding vector must have at least one dimension".to_string(),
            ));
        }
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "embedding component {} is not finite ({})",
                idx, values[idx]
            )));
        }
        Ok(Self(values))
    }

    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl AsRef<[f32]> for EmbeddingVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

impl TryFrom<Vec<f32>> for EmbeddingVector {
    type Error = Error;

    fn try_from(values: Vec<f32>) -> Result<Self> {
        Self::new(values)
    }
}

/// Percentage closeness between two embeddings, in [-100, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SimilarityScore(i32);

impl SimilarityScore {
    pub fn value(self) -> i32 {
        self.0
    }

    /// Score with negative similarity shown as zero, for progress-bar style display.
    pub fn display_percent(self) -> u32 {
        self.0.max(0).unsigned_abs()
    }
}

impl fmt::Display for SimilarityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute cosine similarity between two embedding vectors.
///
/// Fails when the vectors differ in length, are empty, or either has zero
/// magnitude. Sums are accumulated in `f64`; an overflowing or non-finite sum
/// is reported as degenerate rather than returned as NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(Error::InvalidInput(
            "cannot compare empty embeddings".to_string(),
        ));
    }

    // Dot product and both norms in one pass.
    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0.0f64, 0.0f64, 0.0f64), |(dot, na_sq, nb_sq), (x, y)| {
                let x = *x as f64;
                let y = *y as f64;
                (dot + (x * y), na_sq + (x * x), nb_sq + (y * y))
            });

    if !dot.is_finite() || !norm_a_sq.is_finite() || !norm_b_sq.is_finite() {
        return Err(Error::DegenerateVector(
            "similarity is undefined for non-finite components".to_string(),
        ));
    }

    if norm_a_sq == 0.0 || norm_b_sq == 0.0 {
        return Err(Error::DegenerateVector(
            "similarity is undefined for a zero-magnitude vector".to_string(),
        ));
    }

    Ok(dot / (norm_a_sq.sqrt() * norm_b_sq.sqrt()))
}

/// Score how close `candidate` is to `reference`.
///
/// The cosine is clamped to [-1, 1] to absorb rounding overshoot, scaled by
/// 100 and rounded to the nearest integer, with exact halves going up
/// (-12.5 becomes -12). Negative similarity stays negative.
pub fn score(reference: &EmbeddingVector, candidate: &EmbeddingVector) -> Result<SimilarityScore> {
    let cosine = cosine_similarity(reference.as_slice(), candidate.as_slice())?;
    let scaled = cosine.clamp(-1.0, 1.0) * 100.0;
    Ok(SimilarityScore((scaled + 0.5).floor() as i32))
}
