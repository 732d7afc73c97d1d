use crate::domain::EdgeWeightStats;

/// Max, min, mean and sample standard deviation of `weights`.
///
/// Every field is `None` for an empty slice; `std_dev` is also `None` for a
/// single weight.
pub fn edge_weight_stats(weights: &[f64]) -> EdgeWeightStats {
    if weights.is_empty() {
        return EdgeWeightStats::default();
    }

    let n = weights.len() as f64;
    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
    let mean = weights.iter().sum::<f64>() / n;
    let std_dev = (weights.len() > 1).then(|| {
        let sum_sq: f64 = weights.iter().map(|w| (w - mean).powi(2)).sum();
        (sum_sq / (n - 1.0)).sqrt()
    });

    EdgeWeightStats {
        max: Some(max),
        min: Some(min),
        mean: Some(mean),
        std_dev,
    }
}
