//! Drop session arbitration - the timed multi-slot claim engine.
//!
//! A drop publishes N randomly drawn cards and hands each one to the first
//! user who presses its button, within a bounded window, exactly once per
//! slot. The session is an explicit state machine with an explicit deadline
//! rather than an implicit event-subscription lifetime: `Open` accepts
//! claims, `Closed` is terminal, and the transition happens exactly once -
//! when the last slot fills or when the deadline passes, whichever is first.
//!
//! Claims are a compare-and-set over the session's interior state, never a
//! read-then-write. Two claim events for the same slot may be dispatched
//! before either has run; whichever acquires the lock first wins, the other
//! observes [`Error::AlreadyClaimed`]. The deadline is *logical*: a claim
//! carrying a timestamp at or past the deadline is rejected as
//! [`Error::Expired`] even if finalization hasn't executed yet, so nothing
//! can slip in between the timer firing and the summary being composed.

use crate::{
    config::DropsSettings,
    core::{
        cooldown::{CooldownKind, CooldownTracker, Eligibility},
        sampling,
    },
    entities::item,
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// Lifecycle of a drop session. There is no separately observable
/// "resolving" state - the interior mutex is the critical-section marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Claims are being accepted
    Open,
    /// Terminal; reached exactly once
    Closed,
}

/// A recorded claim binding one user to one slot. Append-once: a slot's
/// claim is never overwritten or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Discord user ID of the claimant
    pub user_id: String,
    /// When the claim was granted
    pub claimed_at: DateTime<Utc>,
}

/// A granted claim: the card now owed to the claimant, and whether this
/// claim filled the session (so the caller can finalize early instead of
/// waiting out the deadline).
#[derive(Debug, Clone)]
pub struct ClaimSuccess {
    /// The card in the claimed slot
    pub item: item::Model,
    /// True when every slot is now claimed
    pub session_full: bool,
}

/// One line of the finalize summary.
#[derive(Debug, Clone)]
pub struct SlotOutcome {
    /// The card that was in this slot
    pub item: item::Model,
    /// Who claimed it, or `None` when the slot expired unclaimed
    pub claim: Option<Claim>,
}

/// Summary emitted exactly once when a session closes.
#[derive(Debug, Clone)]
pub struct DropSummary {
    /// The session this summary belongs to
    pub session_id: u64,
    /// Per-slot outcomes, in slot order
    pub slots: Vec<SlotOutcome>,
}

#[derive(Debug)]
struct Inner {
    state: SessionState,
    claims: Vec<Option<Claim>>,
}

/// One timed multi-slot claim opportunity.
#[derive(Debug)]
pub struct DropSession {
    id: u64,
    initiator: String,
    slots: Vec<item::Model>,
    deadline: DateTime<Utc>,
    inner: Mutex<Inner>,
}

impl DropSession {
    /// Builds an open session over pre-drawn slots with
    /// `deadline = now + window`.
    #[must_use]
    pub fn new(
        id: u64,
        initiator: &str,
        slots: Vec<item::Model>,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Self {
        let claims = vec![None; slots.len()];
        Self {
            id,
            initiator: initiator.to_string(),
            slots,
            deadline: now + window,
            inner: Mutex::new(Inner {
                state: SessionState::Open,
                claims,
            }),
        }
    }

    /// Opaque session identity, unique per drop.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// The user who triggered the drop.
    #[must_use]
    pub fn initiator(&self) -> &str {
        &self.initiator
    }

    /// The cards on offer, in slot order.
    #[must_use]
    pub fn slots(&self) -> &[item::Model] {
        &self.slots
    }

    /// Number of slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Absolute time after which no claim is accepted.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Snapshot of the claim map, for rendering the outward message.
    #[must_use]
    pub fn claim_snapshot(&self) -> Vec<Option<Claim>> {
        self.lock().claims.clone()
    }

    /// Attempts to claim a slot for `user_id` at `now`.
    ///
    /// The whole precondition check and the claim record happen under one
    /// lock acquisition, so exactly one of two racing claims on the same
    /// slot can ever succeed. A closed session and a past-deadline claim
    /// both report [`Error::Expired`]; a slot that someone else already
    /// took reports [`Error::AlreadyClaimed`] and changes nothing.
    ///
    /// One user claiming several distinct slots in the same session is
    /// allowed on purpose; observed bot behavior treats it as fair play.
    pub fn try_claim(&self, slot: usize, user_id: &str, now: DateTime<Utc>) -> Result<ClaimSuccess> {
        let mut inner = self.lock();

        if inner.state == SessionState::Closed {
            return Err(Error::Expired);
        }
        if now >= self.deadline {
            return Err(Error::Expired);
        }
        let entry = inner
            .claims
            .get_mut(slot)
            .ok_or(Error::UnknownSlot { index: slot })?;
        if entry.is_some() {
            return Err(Error::AlreadyClaimed);
        }
        *entry = Some(Claim {
            user_id: user_id.to_string(),
            claimed_at: now,
        });

        let session_full = inner.claims.iter().all(Option::is_some);
        debug!(session = self.id, slot, user = %user_id, session_full, "claim recorded");
        Ok(ClaimSuccess {
            item: self.slots[slot].clone(),
            session_full,
        })
    }

    /// Closes the session and composes the summary.
    ///
    /// Only the first call transitions `Open -> Closed` and yields the
    /// summary; every later call returns `None`. That idempotence is what
    /// lets the full-claim path and the deadline-timer path race freely:
    /// whichever reaches the state flip first produces the one summary,
    /// and the loser is a no-op.
    pub fn finalize(&self) -> Option<DropSummary> {
        let mut inner = self.lock();
        if inner.state == SessionState::Closed {
            return None;
        }
        inner.state = SessionState::Closed;

        let slots = self
            .slots
            .iter()
            .zip(inner.claims.iter())
            .map(|(item, claim)| SlotOutcome {
                item: item.clone(),
                claim: claim.clone(),
            })
            .collect();
        Some(DropSummary {
            session_id: self.id,
            slots,
        })
    }
}

/// Creates a drop session: catalog check, cooldown check-and-start, then
/// N independent uniform draws.
///
/// The catalog precondition runs before the cooldown so a drop that cannot
/// happen never burns the initiator's cooldown. Sampling is with
/// replacement - duplicate cards across slots are a valid outcome - but a
/// catalog smaller than the slot count is still rejected rather than
/// clamped.
pub async fn create_session(
    db: &DatabaseConnection,
    cooldowns: &CooldownTracker,
    cfg: &DropsSettings,
    id: u64,
    initiator: &str,
) -> Result<DropSession> {
    let items = crate::core::catalog::all_items(db).await?;
    if items.len() < cfg.slots {
        return Err(Error::InsufficientCatalog {
            have: items.len() as u64,
            need: cfg.slots as u64,
        });
    }

    let now = Utc::now();
    match cooldowns.check_and_start_at(initiator, CooldownKind::Drop, cfg.cooldown(), now) {
        Eligibility::Blocked { remaining } => return Err(Error::OnCooldown { remaining }),
        Eligibility::Ready => {}
    }

    let slots = {
        let mut rng = rand::rng();
        sampling::sample(&items, cfg.slots, &mut rng)
    };
    info!(
        session = id,
        initiator = %initiator,
        slots = slots.len(),
        window_secs = cfg.window_secs,
        "drop session created"
    );
    Ok(DropSession::new(id, initiator, slots, now, cfg.window()))
}
