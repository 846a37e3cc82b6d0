pub mod admin;
pub mod messaging;
pub mod orders;
pub mod services;

use chrono::{DateTime, Utc};

pub const NO_SESSION: &str = "Please login first.";

pub const HOME: &str = "Welcome\nExplore services, chat, and pay securely.";

/// Shortens `text` to at most `width` characters, marking the cut with `…`.
pub fn clamp(text: &str, width: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

pub fn format_timestamp(at: Option<&DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
