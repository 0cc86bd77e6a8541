//! Discord command modules and shared presentation helpers.

/// Inventory, profile, and featured-card commands
pub mod collection;
/// Timed card drop and its claim-button driver
pub mod drop;
/// Daily, gacha, and burn economy commands
pub mod economy;
/// General commands - ping and help
pub mod general;
/// Privileged catalog management commands
pub mod manage;

pub use collection::*;
pub use drop::*;
pub use economy::*;
pub use general::*;
pub use manage::*;

/// Formats a remaining duration into compact human units ("1d 3h 5m 2s").
///
/// Presentation only - the cooldown contract itself deals in raw durations.
#[must_use]
pub(crate) fn format_remaining(remaining: chrono::Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }
    parts.join(" ")
}
