//! Vector similarity.

use crate::error::Error;

/// Cosine similarity of two vectors.
///
/// A zero-magnitude vector has similarity 0.0 with anything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, Error> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch(a.len(), b.len()));
    }

    let mut dot = 0f32;
    let mut norm_a = 0f32;
    let mut norm_b = 0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / denom)
}

/// Score `query` against every candidate and return up to `k` best `(index, score)` pairs.
///
/// Highest score first; equal scores keep candidate order.
pub fn rank<'a, I>(query: &[f32], candidates: I, k: usize) -> Result<Vec<(usize, f32)>, Error>
    where I: IntoIterator<Item = &'a [f32]>
{
    let mut scored = Vec::new();
    for (i, candidate) in candidates.into_iter().enumerate() {
        scored.push((i, cosine_similarity(query, candidate)?));
    }

    // sort_by is stable
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(k);

    Ok(scored)
}
