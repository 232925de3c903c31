//! Subscriber identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SUBSCRIBER: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a subscriber
///
/// The dispatcher only compares identities for equality when removing
/// subscriptions; it never looks behind them. Callers decide what an identity
/// stands for (an entity, a widget, a system) and must unsubscribe before the
/// thing it names goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(pub u64);

impl SubscriberId {
    /// Create a subscriber ID from a raw value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocate a fresh ID from the process-wide counter
    ///
    /// IDs from this counter never repeat within a process, but they can
    /// collide with IDs built by hand through [`SubscriberId::new`].
    pub fn next() -> Self {
        Self(NEXT_SUBSCRIBER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber:{}", self.0)
    }
}

impl From<u64> for SubscriberId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
