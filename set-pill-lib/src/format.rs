// set-pill-lib/src/format.rs

/// Formats a second count as `minutes:seconds`, seconds zero-padded and
/// minutes left unpadded (`65` -> `"1:05"`, `3661` -> `"61:01"`).
pub fn format_duration(total_seconds: u64) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}
