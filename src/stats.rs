//! Small numeric helpers shared by the reports. Degenerate inputs
//! (empty sets, zero totals) reduce to 0 instead of failing.

/// Rounds half away from zero to `places` decimals.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// `part / total × 100`, rounded to one decimal; 0 when `total` is 0.
pub fn percentage(part: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(f64::from(part) / f64::from(total) * 100.0, 1)
}

/// Arithmetic mean, `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        return None;
    }
    Some(sum / n as f64)
}
