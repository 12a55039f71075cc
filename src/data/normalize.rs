use rayon::prelude::*;

/// Parallel min/max scan. `None` for an empty slice.
pub fn find_min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let (min, max) = values
        .par_iter()
        .fold(
            || (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), &v| (min.min(v), max.max(v)),
        )
        .reduce(
            || (f64::INFINITY, f64::NEG_INFINITY),
            |a, b| (a.0.min(b.0), a.1.max(b.1)),
        );
    Some((min, max))
}

/// Rescale `values` into `[0, 1]` in place and return the original range.
///
/// A constant channel has no range to scale by; it is set to zeros.
pub fn normalize_min_max(values: &mut [f64]) -> Option<(f64, f64)> {
    let (min, max) = find_min_max(values)?;
    let range = max - min;

    if range == 0.0 || !range.is_finite() {
        log::warn!(
            "Channel has degenerate range [{}, {}], normalizing to zeros",
            min,
            max
        );
        values.par_iter_mut().for_each(|v| *v = 0.0);
    } else {
        values.par_iter_mut().for_each(|v| *v = (*v - min) / range);
    }

    Some((min, max))
}
