//! Display formatting for the player bar

/// Format a playback position
///
/// Seconds are floored and negative input is treated as zero. Positions of
/// an hour or more render as `HH:MM:SS`, shorter ones as `MM:SS`; every
/// field is zero-padded to two digits.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Format a play count compactly (`999`, `1.2K`, `3.4M`)
///
/// The single decimal is truncated, never rounded up.
pub fn format_play_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{}M", tenths(count, 1_000_000))
    } else if count >= 1_000 {
        format!("{}K", tenths(count, 1_000))
    } else {
        count.to_string()
    }
}

fn tenths(count: u64, unit: u64) -> String {
    // Divide first so saturated counts cannot overflow
    let scaled = count / (unit / 10);
    format!("{}.{}", scaled / 10, scaled % 10)
}
