//! Tidings UI - Bridges UI selectables onto the tidings dispatcher
//!
//! Attach a [`ClickPublisher`] to a widget and every click becomes a message
//! on a [`tidings_bus::Dispatcher`], sent by the widget itself:
//!
//! ```
//! use std::sync::Arc;
//! use tidings_bus::{Dispatcher, SubscriberId};
//! use tidings_ui::{Button, ClickPublisher, PublisherConfig};
//!
//! let bus = Arc::new(Dispatcher::new());
//! bus.subscribe_from::<Button, String, _>(SubscriberId::new(1), |_, msg| {
//!     assert_eq!(msg, "start_game");
//! });
//!
//! let start = ClickPublisher::attach(
//!     Some(Arc::new(Button::new("Start"))),
//!     PublisherConfig::custom("start_game"),
//!     Arc::clone(&bus),
//! );
//! assert!(start.click());
//! ```

mod error;
mod publisher;
mod widget;

pub use error::{Error, Result};
pub use publisher::{ClickPublisher, PublishMode, PublisherConfig, CLICKED};
pub use widget::{Button, Selectable, SelectableEvent, Slider, Toggle};
