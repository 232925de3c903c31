//! Process-wide default dispatcher
//!
//! Hosts that want a single bus without threading a handle through every
//! system can use [`global`]. Everything else (and every test) should own
//! its [`Dispatcher`] explicitly.

use crate::Dispatcher;
use once_cell::sync::Lazy;

static GLOBAL: Lazy<Dispatcher> = Lazy::new(Dispatcher::new);

/// The process-wide dispatcher, created on first use with the default config
pub fn global() -> &'static Dispatcher {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SenderFilter, SubscriberId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // Message type private to this test so other tests cannot interfere
    struct GlobalPing;

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(global(), global()));

        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let me = SubscriberId::next();
        global().subscribe::<GlobalPing, _>(me, move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        global().publish_anonymous(&GlobalPing);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        global().unsubscribe_scoped::<GlobalPing>(me, SenderFilter::Any);
        assert!(!global().has_topic::<GlobalPing>(SenderFilter::Any));
        global().publish_anonymous(&GlobalPing);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
