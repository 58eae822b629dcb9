//! Seconds to "M:SS"

/// Format seconds as `M:SS`, minutes unpadded
///
/// Negative and NaN input reads as zero.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_nan() { 0.0 } else { seconds.max(0.0) };
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", mins, secs)
}
