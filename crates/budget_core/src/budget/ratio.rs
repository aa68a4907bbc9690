//! Usage ratio arithmetic and display strings.
//!
//! A zero limit has no meaningful ratio. It yields `None`, which renders as
//! `"-"` with a zero-width bar. Ratios are never clamped: spending over the
//! limit shows as more than 100%.

/// `usage * 100 / upper_limit` as a float, rounded to one decimal place.
///
/// Rounding applies to the binary quotient, so a decimal tie such as
/// 7 / 2000 (0.35, stored just below) goes to 0.3. Exact binary ties
/// round to even. Returns `None` when `upper_limit` is zero.
pub fn usage_ratio(usage: i64, upper_limit: i64) -> Option<f64> {
    if upper_limit == 0 {
        return None;
    }
    let percent = (i128::from(usage) * 100) as f64 / upper_limit as f64;
    Some(round_tenths(percent))
}

/// `"40.0%"`, or `"-"` when there is no ratio.
pub fn ratio_text(ratio: Option<f64>) -> String {
    match ratio {
        Some(value) => format!("{value:.1}%"),
        None => "-".to_string(),
    }
}

/// Inline style for a proportional bar, e.g. `"width:40.0%"`.
pub fn width_style(ratio: Option<f64>) -> String {
    format!("width:{:.1}%", ratio.unwrap_or(0.0))
}

// `{:.1}` rounds the exact binary value to the nearest tenth, ties to
// even; reparsing yields the closest f64 to that decimal.
fn round_tenths(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}
