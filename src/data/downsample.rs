//! Incremental bucket-mean downsampling for multi-resolution history.

/// Collapse every `factor` consecutive values into their mean.
///
/// Bucket `k` covers input indices `[k * factor, (k + 1) * factor)`; the last
/// bucket may be partial. Each bucket mean is updated online as the series is
/// scanned left to right, so the output length is always
/// `ceil(series.len() / factor)`.
///
/// A `factor` of zero is treated as one.
///
/// # Example
///
/// ```
/// use clusterpulse::data::downsample;
///
/// let coarse = downsample(&[1.0, 3.0, 5.0, 7.0, 9.0], 2);
/// assert_eq!(coarse, vec![2.0, 6.0, 9.0]);
/// ```
pub fn downsample(series: &[f64], factor: usize) -> Vec<f64> {
    let factor = factor.max(1);
    let mut result = Vec::with_capacity(series.len().div_ceil(factor));

    for (i, &value) in series.iter().enumerate() {
        let seen = i % factor;
        if seen == 0 {
            result.push(value);
            continue;
        }

        // Non-empty: the first value of this bucket was pushed above
        if let Some(mean) = result.last_mut() {
            *mean += (value - *mean) / (seen + 1) as f64;
        }
    }

    result
}
