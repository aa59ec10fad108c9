//! TUI module for teamboard
//!
//! Renders one board session:
//! - Team panel (drag source) with per-member assignment dots
//! - Demand columns (drop targets), side by side or as tabs on narrow terminals
//! - Regional wizard for assignment boards

mod app;
mod views;
mod widgets;

pub use app::{run_tui, TuiConfig};

/// Ellipsize text to fit within max_chars
pub fn ellipsize(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else if max_chars == 0 {
        String::new()
    } else {
        let take = max_chars.saturating_sub(1);
        let mut result = value.chars().take(take).collect::<String>();
        result.push('…');
        result
    }
}
