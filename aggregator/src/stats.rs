//! Sample statistics: sanitizing, quantiles, Tukey outlier rejection

/// Keep strictly positive samples, converted with `divisor`.
///
/// Zero and negative values are instrumentation noise. An empty result is
/// replaced by a single synthetic `0.0` so downstream reductions always have
/// a sample; the flag reports whether that happened.
pub fn positive_samples<I>(raw: I, divisor: f64) -> (Vec<f64>, bool)
where
    I: IntoIterator<Item = i64>,
{
    let samples: Vec<f64> = raw
        .into_iter()
        .filter(|&v| v > 0)
        .map(|v| v as f64 / divisor)
        .collect();

    if samples.is_empty() {
        (vec![0.0], true)
    } else {
        (samples, false)
    }
}

/// Quantile `p` in `[0, 1]` of an ascending slice, linearly interpolated
/// between the closest ranks at position `p * (n - 1)`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Median; the mean of the two middle values for even counts
pub fn median(samples: &[f64]) -> Option<f64> {
    quantile_sorted(&sorted_copy(samples), 0.5)
}

/// Inclusive Tukey fences `[Q1 - k*IQR, Q3 + k*IQR]`
pub fn tukey_fences(samples: &[f64], k: f64) -> Option<(f64, f64)> {
    let sorted = sorted_copy(samples);
    let q1 = quantile_sorted(&sorted, 0.25)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    Some((q1 - k * iqr, q3 + k * iqr))
}

/// Drop samples outside the Tukey fences. Input order is preserved.
pub fn remove_outliers(samples: &[f64], k: f64) -> Vec<f64> {
    match tukey_fences(samples, k) {
        Some((lower, upper)) => samples
            .iter()
            .copied()
            .filter(|&x| x >= lower && x <= upper)
            .collect(),
        None => Vec::new(),
    }
}

/// `log10(value)` for strictly positive finite values
pub fn log10_positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then(|| value.log10())
}

/// Min, max, mean and median of a sample set
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl Summary {
    pub fn of(samples: &[f64]) -> Option<Self> {
        let sorted = sorted_copy(samples);
        let median = quantile_sorted(&sorted, 0.5)?;
        Some(Self {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            median,
        })
    }
}
