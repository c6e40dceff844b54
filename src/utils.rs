/// `part / whole × 100`, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

/// Rounds to `places` decimal places, leaving non-finite values untouched.
pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Keeps a value only if it is finite; overflow and 0/0 become `None`.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

pub fn format_kib(bytes: usize) -> String {
    format!("{:.1}KB", bytes as f64 / 1024.0)
}
