//! Tidings Bus - Synchronous in-process publish/subscribe
//!
//! This crate provides the message dispatcher used by the engine's systems
//! and UI to talk to each other without knowing about each other:
//! - Typed messages routed by their Rust type (`MessageKind`)
//! - Optional filtering by the sender's type (`SenderFilter`)
//! - Four unsubscribe scopes: everything, one message type, one sender
//!   type, or one exact topic
//!
//! ## Delivery
//!
//! ```text
//! publish(&button, &Clicked)
//!  │
//!  ├── (Clicked, Any)     ← subscribers that want every Clicked
//!  │
//!  └── (Clicked, Button)  ← subscribers that want Clicked from buttons only
//! ```
//!
//! Delivery is synchronous, on the publisher's thread, in registration order
//! within each topic. There is no queueing, persistence or retry.
//!
//! ## Sharing
//!
//! A [`Dispatcher`] is `Send + Sync`. Construct one and share it by reference
//! or `Arc`, or use the lazily created process-wide [`global()`] instance.

mod config;
mod dispatcher;
mod error;
mod global;
mod identity;
mod kind;

pub use config::{DispatcherConfig, PrunePolicy};
pub use dispatcher::{Callback, Dispatcher};
pub use error::{Error, Result};
pub use global::global;
pub use identity::SubscriberId;
pub use kind::{MessageKind, SenderFilter, SenderKind, TopicKey};
