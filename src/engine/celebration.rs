use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Celebration {
    pub id: Uuid,
    pub milestone: u32,
    pub shown_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct Slot {
    live: Option<Celebration>,
    expiry: Option<JoinHandle<()>>,
}

impl Slot {
    fn cancel_expiry(&mut self) {
        if let Some(handle) = self.expiry.take() {
            handle.abort();
        }
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.cancel_expiry();
    }
}

/// Holds at most one live celebration. A new one replaces the previous and
/// reschedules the expiry; nothing fires once the timer is dropped.
#[derive(Clone)]
pub struct CelebrationTimer {
    slot: Arc<Mutex<Slot>>,
    ttl: Duration,
}

impl CelebrationTimer {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&self, milestone: u32) -> Celebration {
        let shown_at = Utc::now();
        let expires_at = chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| shown_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let celebration = Celebration {
            id: Uuid::new_v4(),
            milestone,
            shown_at,
            expires_at,
        };

        let mut slot = self.lock();
        slot.cancel_expiry();
        if let Some(previous) = slot.live.replace(celebration.clone()) {
            tracing::debug!(
                "Celebration for {} mi superseded by {} mi",
                previous.milestone,
                milestone
            );
        }
        slot.expiry = Some(tokio::spawn(expire(
            Arc::downgrade(&self.slot),
            celebration.id,
            self.ttl,
        )));

        tracing::info!("Celebrating {} mile ride", milestone);
        celebration
    }

    pub fn current(&self) -> Option<Celebration> {
        self.lock().live.clone()
    }

    pub fn cancel(&self) {
        let mut slot = self.lock();
        slot.cancel_expiry();
        slot.live = None;
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

async fn expire(slot: Weak<Mutex<Slot>>, id: Uuid, ttl: Duration) {
    tokio::time::sleep(ttl).await;
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let mut slot = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if slot.live.as_ref().map(|c| c.id) == Some(id) {
        slot.live = None;
        slot.expiry = None;
        tracing::debug!("Celebration {} expired", id);
    }
}
