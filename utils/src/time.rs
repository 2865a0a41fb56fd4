//! Time formatting helpers.

use forge_types::BlockHeight;

/// Target seconds per block.
pub const BLOCK_TIME_SECS: u64 = 600;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Approximate wall-clock wait until `unlock` is reached from `now`.
pub fn format_height_delay(now: BlockHeight, unlock: BlockHeight) -> String {
    format_duration(now.blocks_until(unlock) as u64 * BLOCK_TIME_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(61), "1m 1s");
        assert_eq!(format_duration(3 * 3600 + 120), "3h 2m");
        assert_eq!(format_duration(2 * 86400 + 3600), "2d 1h");
    }

    #[test]
    fn month_lock_is_thirty_days() {
        let now = BlockHeight::new(1000);
        assert_eq!(format_height_delay(now, now.after(4320)), "30d 0h");
        assert_eq!(format_height_delay(now, now), "0s");
    }
}
