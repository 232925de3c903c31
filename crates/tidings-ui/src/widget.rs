//! Selectable widget kinds that can act as message senders
//!
//! The concrete widget type is what sender-filtered subscribers match on:
//! subscribing with `SenderFilter::of::<Button>()` only hears clicks that
//! were published by a [`Button`].

use serde::{Deserialize, Serialize};
use std::any::Any;

/// Event published in [`PublishMode::EventTypeAsEnum`](crate::PublishMode::EventTypeAsEnum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectableEvent {
    Clicked,
}

/// A UI element the user can select
pub trait Selectable: Any + Send + Sync {
    /// Display label
    fn label(&self) -> &str;

    /// Whether this widget raises click events
    fn accepts_clicks(&self) -> bool;
}

/// Push button; the only built-in widget that publishes clicks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Text shown on the button
    pub label: String,
}

impl Button {
    /// Create a button with the given label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Selectable for Button {
    fn label(&self) -> &str {
        &self.label
    }

    fn accepts_clicks(&self) -> bool {
        true
    }
}

/// Two-state toggle
///
/// Selectable, but its state changes are not forwarded as clicks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    /// Text shown next to the toggle
    pub label: String,
}

impl Toggle {
    /// Create a toggle with the given label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Selectable for Toggle {
    fn label(&self) -> &str {
        &self.label
    }

    fn accepts_clicks(&self) -> bool {
        false
    }
}

/// Value slider; dragged, never clicked
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    /// Text shown next to the slider
    pub label: String,
    /// Current position
    pub value: f32,
}

impl Slider {
    /// Create a slider at the given position
    pub fn new(label: impl Into<String>, value: f32) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl Selectable for Slider {
    fn label(&self) -> &str {
        &self.label
    }

    fn accepts_clicks(&self) -> bool {
        false
    }
}
