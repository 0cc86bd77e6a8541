//! Atomic per-user, per-action cooldown tracking.
//!
//! The tracker owns its map outright and exposes a single check-and-set
//! operation; callers never see the raw entries. Checking eligibility and
//! booking the next-eligible time happen under one lock acquisition, so two
//! concurrent invocations can never both pass. State is in-memory and resets
//! on restart, which is the lighter of the two persistence choices the
//! economy tolerates (see DESIGN.md).

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// The actions that carry an independent per-user cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CooldownKind {
    /// Starting a card drop
    Drop,
    /// Claiming the daily reward
    Daily,
}

/// Result of a cooldown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// The action may proceed; the cooldown has been booked.
    Ready,
    /// The action is blocked until the remaining duration elapses.
    Blocked {
        /// Time left until the action becomes eligible
        remaining: Duration,
    },
}

/// Tracks next-eligible timestamps per (user, action) pair.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    next_eligible: Mutex<HashMap<(String, CooldownKind), DateTime<Utc>>>,
}

impl CooldownTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks eligibility at `now` and, if ready, books `now + duration` as
    /// the next-eligible time in the same lock acquisition.
    ///
    /// Entries are created lazily on first use and never explicitly removed;
    /// an expired entry is simply overwritten by the next successful check.
    pub fn check_and_start_at(
        &self,
        user_id: &str,
        kind: CooldownKind,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Eligibility {
        let mut entries = self
            .next_eligible
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let key = (user_id.to_string(), kind);
        if let Some(next) = entries.get(&key) {
            if now < *next {
                return Eligibility::Blocked {
                    remaining: *next - now,
                };
            }
        }
        entries.insert(key, now + duration);
        Eligibility::Ready
    }

    /// [`Self::check_and_start_at`] against the wall clock.
    pub fn check_and_start(
        &self,
        user_id: &str,
        kind: CooldownKind,
        duration: Duration,
    ) -> Eligibility {
        self.check_and_start_at(user_id, kind, duration, Utc::now())
    }
}
