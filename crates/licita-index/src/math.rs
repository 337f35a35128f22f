/// Scale `v` to unit length, or `None` when its norm is zero or not finite
pub fn normalize(v: &[f32]) -> Option<Vec<f32>> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if !norm.is_finite() || norm <= f32::EPSILON {
        return None;
    }
    Some(v.iter().map(|x| x / norm).collect())
}

pub fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Cosine similarity of two unit vectors from their squared distance,
/// clamped into [0, 1]
pub fn cosine_from_distance(squared_distance: f32) -> f32 {
    (1.0 - squared_distance / 2.0).clamp(0.0, 1.0)
}
