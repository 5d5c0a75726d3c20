//! Runtime and remaining-time strings derived from server ticks.

/// One tick is 100ns.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// `H:MM` when there is at least one hour, otherwise `MMm`.
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds - hours * 3600) / 60;
    if hours != 0 {
        format!("{hours}:{minutes:02}")
    } else {
        format!("{minutes:02}m")
    }
}

pub fn runtime_string(runtime_ticks: i64) -> String {
    format_clock(runtime_ticks / TICKS_PER_SECOND)
}

/// Time left to watch. `None` until playback has started.
pub fn remaining_string(runtime_ticks: i64, progress_ticks: i64) -> Option<String> {
    if progress_ticks == 0 {
        return None;
    }
    let remaining = runtime_ticks.saturating_sub(progress_ticks).max(0);
    Some(format_clock(remaining / TICKS_PER_SECOND))
}
