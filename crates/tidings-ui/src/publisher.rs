//! Click publisher - forwards a widget's clicks onto a dispatcher
//!
//! A publisher is attached to one widget. Every click publishes one message
//! with the widget itself as the sender, so subscribers can listen to all
//! clicks or only to clicks from one widget kind.

use crate::error::Result;
use crate::widget::{Selectable, SelectableEvent};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tidings_bus::Dispatcher;
use tracing::{trace, warn};

/// Text published in [`PublishMode::EventTypeAsString`]
pub const CLICKED: &str = "Clicked";

/// Which message a click turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PublishMode {
    /// Publish the `String` `"Clicked"`
    #[default]
    EventTypeAsString,
    /// Publish [`SelectableEvent::Clicked`]
    EventTypeAsEnum,
    /// Publish the configured custom message as a `String`
    CustomString,
}

/// Configuration for a [`ClickPublisher`]
///
/// # Example
///
/// ```
/// use tidings_ui::{PublishMode, PublisherConfig};
///
/// let config = PublisherConfig::from_ron("(mode: CustomString, custom_message: \"open_map\")").unwrap();
/// assert_eq!(config.mode, PublishMode::CustomString);
/// assert_eq!(config.custom_message, "open_map");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Message published on click
    pub mode: PublishMode,
    /// Sent if and only if `mode` is [`PublishMode::CustomString`]
    pub custom_message: String,
}

impl PublisherConfig {
    /// Publish the given mode's message
    pub fn new(mode: PublishMode) -> Self {
        Self {
            mode,
            custom_message: String::new(),
        }
    }

    /// Publish a custom string on every click
    pub fn custom(message: impl Into<String>) -> Self {
        Self {
            mode: PublishMode::CustomString,
            custom_message: message.into(),
        }
    }

    /// Parse a configuration from RON text
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }
}

/// Publishes a message on the dispatcher each time its widget is clicked
pub struct ClickPublisher<S: Selectable> {
    source: Option<Arc<S>>,
    wired: bool,
    config: PublisherConfig,
    bus: Arc<Dispatcher>,
}

impl<S: Selectable> ClickPublisher<S> {
    /// Attach a publisher to a widget
    ///
    /// Without a widget the publisher is inert. A widget that does not raise
    /// click events is kept but never wired, so [`click`](Self::click) does
    /// nothing for it.
    pub fn attach(source: Option<Arc<S>>, config: PublisherConfig, bus: Arc<Dispatcher>) -> Self {
        let wired = match &source {
            None => {
                warn!("no selectable attached, click publisher will not publish any messages");
                false
            }
            Some(widget) => widget.accepts_clicks(),
        };
        if config.mode == PublishMode::CustomString && config.custom_message.is_empty() {
            warn!("click publisher in custom mode has an empty custom message");
        }
        Self {
            source,
            wired,
            config,
            bus,
        }
    }

    /// Whether clicks on the widget reach the dispatcher
    pub fn is_wired(&self) -> bool {
        self.wired
    }

    /// The attached widget, if any
    pub fn source(&self) -> Option<&S> {
        self.source.as_deref()
    }

    /// Get the configuration
    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// Handle a click on the widget
    ///
    /// Returns true if a message was published.
    pub fn click(&self) -> bool {
        let Some(widget) = self.source.as_deref().filter(|_| self.wired) else {
            return false;
        };
        trace!(widget = widget.label(), mode = ?self.config.mode, "click");
        match self.config.mode {
            PublishMode::EventTypeAsString => self.bus.publish(widget, &CLICKED.to_string()),
            PublishMode::EventTypeAsEnum => self.bus.publish(widget, &SelectableEvent::Clicked),
            PublishMode::CustomString => self.bus.publish(widget, &self.config.custom_message),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{Button, Slider, Toggle};
    use crate::Error;
    use parking_lot::Mutex;
    use tidings_bus::{SenderFilter, SubscriberId};

    /// Clickable widget that is not a button
    struct MenuItem(&'static str);

    impl Selectable for MenuItem {
        fn label(&self) -> &str {
            self.0
        }

        fn accepts_clicks(&self) -> bool {
            true
        }
    }

    fn strings(bus: &Dispatcher, filter: SenderFilter) -> Arc<Mutex<Vec<String>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let out = Arc::clone(&seen);
        bus.subscribe_filtered::<String, _>(SubscriberId::next(), filter, move |_, msg| {
            out.lock().push(msg.clone())
        });
        seen
    }

    #[test]
    fn test_string_mode_publishes_clicked() {
        let bus = Arc::new(Dispatcher::new());
        let seen = strings(&bus, SenderFilter::Any);
        let publisher = ClickPublisher::attach(
            Some(Arc::new(Button::new("ok"))),
            PublisherConfig::default(),
            Arc::clone(&bus),
        );

        assert!(publisher.is_wired());
        assert!(publisher.click());
        assert_eq!(*seen.lock(), vec![CLICKED.to_string()]);
    }

    #[test]
    fn test_custom_mode_publishes_custom_message() {
        let bus = Arc::new(Dispatcher::new());
        let seen = strings(&bus, SenderFilter::Any);
        let publisher = ClickPublisher::attach(
            Some(Arc::new(Button::new("map"))),
            PublisherConfig::custom("open_map"),
            Arc::clone(&bus),
        );

        publisher.click();
        assert_eq!(*seen.lock(), vec!["open_map".to_string()]);
    }

    #[test]
    fn test_enum_mode_publishes_event() {
        let bus = Arc::new(Dispatcher::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let out = Arc::clone(&seen);
        bus.subscribe::<SelectableEvent, _>(SubscriberId::new(1), move |_, event| {
            out.lock().push(*event)
        });
        let texts = strings(&bus, SenderFilter::Any);

        let publisher = ClickPublisher::attach(
            Some(Arc::new(Button::new("mute"))),
            PublisherConfig::new(PublishMode::EventTypeAsEnum),
            Arc::clone(&bus),
        );
        assert_eq!(publisher.config().mode, PublishMode::EventTypeAsEnum);
        publisher.click();
        assert_eq!(*seen.lock(), vec![SelectableEvent::Clicked]);
        assert!(texts.lock().is_empty());
    }

    #[test]
    fn test_sender_is_the_widget() {
        let bus = Arc::new(Dispatcher::new());
        let buttons_only = strings(&bus, SenderFilter::of::<Button>());
        let labels = Arc::new(Mutex::new(Vec::new()));
        let out = Arc::clone(&labels);
        bus.subscribe::<String, _>(SubscriberId::new(7), move |sender, _| {
            if let Some(button) = sender.and_then(|s| s.downcast_ref::<Button>()) {
                out.lock().push(button.label.clone());
            }
        });

        let button = ClickPublisher::attach(
            Some(Arc::new(Button::new("ok"))),
            PublisherConfig::default(),
            Arc::clone(&bus),
        );
        let item = ClickPublisher::attach(
            Some(Arc::new(MenuItem("Options"))),
            PublisherConfig::default(),
            Arc::clone(&bus),
        );

        assert!(item.click());
        assert!(button.click());
        assert_eq!(*buttons_only.lock(), vec![CLICKED.to_string()]);
        assert_eq!(*labels.lock(), vec!["ok".to_string()]);
    }

    #[test]
    fn test_missing_source_is_inert() {
        let bus = Arc::new(Dispatcher::new());
        let seen = strings(&bus, SenderFilter::Any);
        let publisher: ClickPublisher<Button> =
            ClickPublisher::attach(None, PublisherConfig::default(), Arc::clone(&bus));

        assert!(!publisher.is_wired());
        assert!(publisher.source().is_none());
        assert!(!publisher.click());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_non_clickable_source_is_not_wired() {
        let bus = Arc::new(Dispatcher::new());
        let seen = strings(&bus, SenderFilter::Any);
        let publisher = ClickPublisher::attach(
            Some(Arc::new(Slider::new("volume", 0.8))),
            PublisherConfig::default(),
            Arc::clone(&bus),
        );

        assert!(publisher.source().is_some());
        assert!(!publisher.is_wired());
        assert!(!publisher.click());

        let toggle = ClickPublisher::attach(
            Some(Arc::new(Toggle::new("mute"))),
            PublisherConfig::new(PublishMode::EventTypeAsEnum),
            Arc::clone(&bus),
        );
        assert!(!toggle.is_wired());
        assert!(!toggle.click());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_config_from_ron() {
        let config = PublisherConfig::from_ron("(mode: EventTypeAsEnum)").unwrap();
        assert_eq!(config, PublisherConfig::new(PublishMode::EventTypeAsEnum));

        let err = PublisherConfig::from_ron("(mode: Shout)").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
