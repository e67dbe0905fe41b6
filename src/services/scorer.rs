//! Cosine similarity scoring between resume chunks and a job description.

/// Cosine similarity of two vectors scaled to a -100..=100 range and rounded
/// to two decimals.
///
/// Identical directions score `100.0`, orthogonal ones `0.0` and opposite ones
/// `-100.0`. The result is not clamped. A zero-norm vector scores `0.0`.
pub fn similarity(a: &[f32], b: &[f32]) -> Result<f64, ScoreError> {
    if a.len() != b.len() {
        return Err(ScoreError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(ScoreError::EmptyVector);
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let cosine = dot / (norm_a.sqrt() * norm_b.sqrt());
    Ok(round2(cosine * 100.0))
}

/// Mean of per-chunk scores, rounded to two decimals.
///
/// Scores are summed in ascending order so the result does not depend on the
/// order chunks were scored in.
pub fn aggregate(scores: &[f64]) -> Result<f64, ScoreError> {
    if scores.is_empty() {
        return Err(ScoreError::NoChunks);
    }
    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);
    let sum: f64 = sorted.iter().sum();
    Ok(round2(sum / sorted.len() as f64))
}

/// Score every chunk embedding against the job description and average.
pub fn score_chunks(chunks: &[Vec<f32>], job_description: &[f32]) -> Result<f64, ScoreError> {
    let scores = chunks
        .iter()
        .map(|chunk| similarity(chunk, job_description))
        .collect::<Result<Vec<_>, _>>()?;
    aggregate(&scores)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("no resume chunks to score")]
    NoChunks,

    #[error("embedding dimensions differ ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },

    #[error("cannot score an empty embedding")]
    EmptyVector,
}
