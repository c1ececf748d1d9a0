use crate::models::AffinityScore;

/// Distance between two affinity scores
///
/// ALQ is a scalar, so this is the absolute difference. Always finite and
/// non-negative because [`AffinityScore`] rejects non-finite values.
#[inline]
pub fn affinity_distance(a: AffinityScore, b: AffinityScore) -> f64 {
    (a.value() - b.value()).abs()
}
