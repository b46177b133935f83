//! Shared formatting helpers for list cards.
//!
//! All pure formatting functions (no styling, no layout) live here. Callers
//! pass `now` explicitly so output is reproducible.

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Format `timestamp` as a compact age relative to `now`.
///
/// `"just now"` under a minute, then `"5m"`, `"2h"`, `"3d"` with floored
/// values, and a short date (`"Mar 5"`) from one week on. Timestamps in the
/// future count as `"just now"`.
pub fn relative_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp).num_seconds();
    if elapsed < MINUTE {
        "just now".to_string()
    } else if elapsed < HOUR {
        format!("{}m", elapsed / MINUTE)
    } else if elapsed < DAY {
        format!("{}h", elapsed / HOUR)
    } else if elapsed < WEEK {
        format!("{}d", elapsed / DAY)
    } else {
        timestamp.format("%b %-d").to_string()
    }
}

/// Format node/edge counts for a card footer: `"3 nodes · 1 edge"`.
pub fn format_counts(nodes: u32, edges: u32) -> String {
    format!(
        "{} {} · {} {}",
        nodes,
        if nodes == 1 { "node" } else { "nodes" },
        edges,
        if edges == 1 { "edge" } else { "edges" },
    )
}

/// Truncate to at most `max_chars` characters, ending with `…` when cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Collapse newlines, tabs and repeated spaces so text fits on one line.
pub fn single_line(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                result.push(' ');
            }
            prev_space = true;
        } else {
            result.push(ch);
            prev_space = false;
        }
    }
    result.trim().to_string()
}
