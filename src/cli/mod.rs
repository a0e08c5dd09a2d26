//! Subcommand implementations

pub mod correlate;
pub mod delete;
pub mod discover;
pub mod import;
pub mod list;
pub mod show;
pub mod stats;

/// Short form of a record id for table display.
fn short_id(id: &str) -> &str {
    &id[..8.min(id.len())]
}

/// Truncate free text to a single display line.
fn truncate(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or(text);
    if line.chars().count() > max {
        let cut: String = line.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

/// Render an epoch-millisecond timestamp for table display.
fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
