//! The dispatcher: a registry of topics and the publish/unsubscribe algorithms over it
//!
//! ## Routing
//!
//! Every subscription lives in exactly one topic, keyed by the message type
//! and a sender filter (`Any` or one concrete sender type). Publishing a
//! message of type `M` from a sender of type `S` runs two phases:
//!
//! ```text
//! publish(&sender, &msg)
//!   1. topic (M, Any)      -> every unfiltered subscriber, in registration order
//!   2. topic (M, Kind(S))  -> every subscriber filtered to S, in registration order
//! ```
//!
//! Anonymous publishes have no sender kind and only run phase 1.
//!
//! ## Re-entrancy
//!
//! Callbacks of both phases are snapshotted under one lock acquisition and
//! invoked after the lock is released. A callback may subscribe, unsubscribe
//! or publish on the same dispatcher. Subscriptions added during a publish
//! do not see that publish; subscriptions removed during a publish still
//! receive it if they were part of the snapshot.
//!
//! ## Callback panics
//!
//! Callbacks are not isolated. A panicking callback unwinds into the
//! publisher, and the remaining callbacks of that publish (including the
//! whole second phase) are skipped. The registry is not affected because no
//! lock is held while callbacks run.

use crate::config::DispatcherConfig;
use crate::error::{Error, Result};
use crate::identity::SubscriberId;
use crate::kind::{MessageKind, SenderFilter, SenderKind, TopicKey};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A strongly typed subscriber callback
///
/// Receives the sender (absent for anonymous publishes) and the message.
pub type Callback<M> = Arc<dyn Fn(Option<&dyn Any>, &M) + Send + Sync>;

/// Callback with the message type erased; built once per subscription
type ErasedCallback = Arc<dyn Fn(Option<&dyn Any>, &dyn Any) + Send + Sync>;

/// One registered interest
struct Subscription {
    subscriber: SubscriberId,
    callback: ErasedCallback,
}

/// Ordered subscriptions for one topic key
#[derive(Default)]
struct Topic {
    subscriptions: Vec<Subscription>,
}

impl Topic {
    /// Remove every subscription of `subscriber`, returning how many went
    fn remove(&mut self, subscriber: SubscriberId) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.subscriber != subscriber);
        before - self.subscriptions.len()
    }

    fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    fn callbacks(&self) -> impl Iterator<Item = ErasedCallback> + '_ {
        self.subscriptions.iter().map(|s| Arc::clone(&s.callback))
    }
}

/// Process-local publish/subscribe dispatcher
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use tidings_bus::{Dispatcher, SubscriberId};
///
/// struct Button;
/// struct Clicked;
///
/// let bus = Dispatcher::new();
/// let hits = Arc::new(AtomicUsize::new(0));
///
/// let counter = Arc::clone(&hits);
/// bus.subscribe_from::<Button, Clicked, _>(SubscriberId::new(1), move |_, _| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// bus.publish(&Button, &Clicked);
/// bus.publish_anonymous(&Clicked);
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
pub struct Dispatcher {
    /// Topics in creation order
    topics: Mutex<IndexMap<TopicKey, Topic>>,
    config: DispatcherConfig,
}

impl Dispatcher {
    /// Create a dispatcher with the default configuration
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Create a dispatcher with a specific configuration
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            topics: Mutex::new(IndexMap::new()),
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Subscribe to every message of type `M`, whoever sends it
    pub fn subscribe<M, F>(&self, subscriber: SubscriberId, callback: F)
    where
        M: Any,
        F: Fn(Option<&dyn Any>, &M) + Send + Sync + 'static,
    {
        self.subscribe_filtered(subscriber, SenderFilter::Any, callback);
    }

    /// Subscribe to messages of type `M` sent by senders of type `S`
    pub fn subscribe_from<S, M, F>(&self, subscriber: SubscriberId, callback: F)
    where
        S: Any,
        M: Any,
        F: Fn(Option<&dyn Any>, &M) + Send + Sync + 'static,
    {
        self.subscribe_filtered(subscriber, SenderFilter::of::<S>(), callback);
    }

    /// Subscribe to messages of type `M` matching `filter`
    ///
    /// Subscribing the same subscriber twice to the same key registers two
    /// independent subscriptions; both fire on every matching publish.
    pub fn subscribe_filtered<M, F>(&self, subscriber: SubscriberId, filter: SenderFilter, callback: F)
    where
        M: Any,
        F: Fn(Option<&dyn Any>, &M) + Send + Sync + 'static,
    {
        self.insert::<M>(subscriber, filter, Arc::new(callback));
    }

    /// Subscribe with a callback that may be missing
    ///
    /// Entry point for bindings that hand over callbacks from outside Rust.
    /// A missing callback is rejected with [`Error::InvalidArgument`] and
    /// nothing is registered.
    pub fn try_subscribe<M: Any>(
        &self,
        subscriber: SubscriberId,
        filter: SenderFilter,
        callback: Option<Callback<M>>,
    ) -> Result<()> {
        let Some(callback) = callback else {
            let key = TopicKey::new(MessageKind::of::<M>(), filter);
            warn!(bus = %self.config.label, topic = %key, %subscriber, "rejected subscription without callback");
            return Err(Error::InvalidArgument(format!(
                "{} subscribed to {} without a callback",
                subscriber, key
            )));
        };
        self.insert::<M>(subscriber, filter, callback);
        Ok(())
    }

    fn insert<M: Any>(&self, subscriber: SubscriberId, filter: SenderFilter, callback: Callback<M>) {
        let key = TopicKey::new(MessageKind::of::<M>(), filter);
        // The topic key pins the message type, so the downcast only fails if
        // a message of another type is routed here, which dispatch never does.
        let erased: ErasedCallback = Arc::new(move |sender: Option<&dyn Any>, message: &dyn Any| {
            if let Some(message) = message.downcast_ref::<M>() {
                callback(sender, message);
            }
        });

        let mut topics = self.topics.lock();
        let topic = topics.entry(key).or_default();
        topic.subscriptions.push(Subscription {
            subscriber,
            callback: erased,
        });
        debug!(
            bus = %self.config.label,
            topic = %key,
            %subscriber,
            subscriptions = topic.subscriptions.len(),
            "subscribed"
        );
    }

    /// Publish a message on behalf of `sender`
    ///
    /// Delivers to the unfiltered subscribers of `M` first, then to the
    /// subscribers filtered to the sender's concrete type. A sender already
    /// erased into `Box<dyn Any ..>` or `Arc<dyn Any + Send + Sync>` is
    /// routed by the value inside. Other wrappers are routed as themselves:
    /// publish `&*arc`, not `&arc`, to be seen as the pointee.
    pub fn publish<S: Any, M: Any>(&self, sender: &S, message: &M) {
        let inner = unwrap_erased(sender);
        let kind = if (*inner).type_id() == TypeId::of::<S>() {
            SenderKind::of::<S>()
        } else {
            SenderKind::of_dyn(inner)
        };
        self.dispatch(Some((inner, kind)), message);
    }

    /// Publish on behalf of a sender whose type is only known at runtime
    ///
    /// The sender kind is read from the value, so a heterogeneous list of
    /// boxed senders routes each one to its own filtered subscribers.
    pub fn publish_dyn<M: Any>(&self, sender: &dyn Any, message: &M) {
        let inner = unwrap_erased(sender);
        self.dispatch(Some((inner, SenderKind::of_dyn(inner))), message);
    }

    /// Publish a message with no sender
    ///
    /// Only unfiltered subscribers of `M` receive it.
    pub fn publish_anonymous<M: Any>(&self, message: &M) {
        self.dispatch(None, message);
    }

    fn dispatch<M: Any>(&self, sender: Option<(&dyn Any, SenderKind)>, message: &M) {
        let kind = MessageKind::of::<M>();

        let (unfiltered, filtered) = {
            let topics = self.topics.lock();
            let snapshot = |filter: SenderFilter| -> Vec<ErasedCallback> {
                topics
                    .get(&TopicKey::new(kind, filter))
                    .map(|topic| topic.callbacks().collect())
                    .unwrap_or_default()
            };
            let unfiltered = snapshot(SenderFilter::Any);
            let filtered = match sender {
                Some((_, sender_kind)) => snapshot(SenderFilter::Kind(sender_kind)),
                None => Vec::new(),
            };
            (unfiltered, filtered)
        };

        trace!(
            bus = %self.config.label,
            message = %kind,
            sender = %sender.map(|(_, k)| k.to_string()).unwrap_or_else(|| "<none>".to_string()),
            unfiltered = unfiltered.len(),
            filtered = filtered.len(),
            "publish"
        );

        let sender = sender.map(|(sender, _)| sender);
        for callback in unfiltered.iter().chain(filtered.iter()) {
            callback(sender, message as &dyn Any);
        }
    }

    /// Remove every subscription of `subscriber`, in every topic
    ///
    /// Returns the number of subscriptions removed.
    pub fn unsubscribe(&self, subscriber: SubscriberId) -> usize {
        self.remove_matching(subscriber, |_| true, self.config.prunes_always())
    }

    /// Remove `subscriber` from every topic of message type `M`
    ///
    /// Covers the unfiltered topic and every sender-filtered topic of `M`.
    pub fn unsubscribe_message<M: Any>(&self, subscriber: SubscriberId) -> usize {
        let kind = MessageKind::of::<M>();
        self.remove_matching(subscriber, |key| key.message == kind, self.config.prunes_always())
    }

    /// Remove `subscriber` from every topic with sender filter `filter`, for all message types
    pub fn unsubscribe_sender(&self, subscriber: SubscriberId, filter: SenderFilter) -> usize {
        self.remove_matching(subscriber, |key| key.sender == filter, self.config.prunes_always())
    }

    /// Remove `subscriber` from exactly the topic (`M`, `filter`)
    ///
    /// If that topic ends up empty it is dropped from the registry.
    pub fn unsubscribe_scoped<M: Any>(&self, subscriber: SubscriberId, filter: SenderFilter) -> usize {
        let key = TopicKey::new(MessageKind::of::<M>(), filter);
        let mut topics = self.topics.lock();
        let Some(topic) = topics.get_mut(&key) else {
            return 0;
        };
        let removed = topic.remove(subscriber);
        if topic.is_empty() {
            topics.shift_remove(&key);
            debug!(bus = %self.config.label, topic = %key, "pruned empty topic");
        }
        if removed > 0 {
            debug!(bus = %self.config.label, topic = %key, %subscriber, removed, "unsubscribed");
        }
        removed
    }

    fn remove_matching(
        &self,
        subscriber: SubscriberId,
        in_scope: impl Fn(&TopicKey) -> bool,
        prune: bool,
    ) -> usize {
        let mut topics = self.topics.lock();
        let removed: usize = topics
            .iter_mut()
            .filter_map(|(key, topic)| in_scope(key).then(|| topic.remove(subscriber)))
            .sum();

        if prune {
            let before = topics.len();
            topics.retain(|key, topic| !(in_scope(key) && topic.is_empty()));
            let pruned = before - topics.len();
            if pruned > 0 {
                debug!(bus = %self.config.label, pruned, "pruned empty topics");
            }
        }
        if removed > 0 {
            debug!(bus = %self.config.label, %subscriber, removed, "unsubscribed");
        }
        removed
    }

    /// Number of topics in the registry, including empty ones
    pub fn topic_count(&self) -> usize {
        self.topics.lock().len()
    }

    /// Total number of subscriptions across all topics
    pub fn subscription_count(&self) -> usize {
        self.topics
            .lock()
            .values()
            .map(|topic| topic.subscriptions.len())
            .sum()
    }

    /// Check if the topic (`M`, `filter`) exists, even if empty
    pub fn has_topic<M: Any>(&self, filter: SenderFilter) -> bool {
        self.topics
            .lock()
            .contains_key(&TopicKey::new(MessageKind::of::<M>(), filter))
    }

    /// Check if `subscriber` holds at least one subscription
    pub fn is_subscribed(&self, subscriber: SubscriberId) -> bool {
        self.topics
            .lock()
            .values()
            .any(|topic| topic.subscriptions.iter().any(|s| s.subscriber == subscriber))
    }
}

/// Look through type-erased smart pointers to the sender they hold
fn unwrap_erased(sender: &dyn Any) -> &dyn Any {
    if let Some(inner) = sender.downcast_ref::<Box<dyn Any + Send + Sync>>() {
        return unwrap_erased(&**inner);
    }
    if let Some(inner) = sender.downcast_ref::<Box<dyn Any + Send>>() {
        return unwrap_erased(&**inner);
    }
    if let Some(inner) = sender.downcast_ref::<Box<dyn Any>>() {
        return unwrap_erased(&**inner);
    }
    if let Some(inner) = sender.downcast_ref::<Arc<dyn Any + Send + Sync>>() {
        return unwrap_erased(&**inner);
    }
    sender
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("label", &self.config.label)
            .field("prune", &self.config.prune)
            .field("topics", &self.topic_count())
            .finish()
    }
}

// Compile-time check that a dispatcher can be shared between threads.
fn _assert_send_sync<T: Send + Sync>() {}
fn _dispatcher_is_send_sync() {
    _assert_send_sync::<Dispatcher>();
}
