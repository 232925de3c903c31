//! Routing keys: message kinds, sender kinds and the topic key built from them

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier for a message's concrete type
///
/// Equality and hashing use only the `TypeId`; the name is kept for logs.
#[derive(Debug, Clone, Copy)]
pub struct MessageKind {
    id: TypeId,
    name: &'static str,
}

impl MessageKind {
    /// The kind of messages of type `M`
    pub fn of<M: Any>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            name: type_name::<M>(),
        }
    }

    /// Type name, for diagnostics only
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for MessageKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MessageKind {}

impl Hash for MessageKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Identifier for a sender's concrete type
///
/// Kinds taken from a type carry its name; kinds read off a `&dyn Any` at
/// runtime only have the `TypeId`. Both compare equal for the same type.
#[derive(Debug, Clone, Copy)]
pub struct SenderKind {
    id: TypeId,
    name: Option<&'static str>,
}

impl SenderKind {
    /// The kind of senders of type `S`
    pub fn of<S: Any>() -> Self {
        Self {
            id: TypeId::of::<S>(),
            name: Some(type_name::<S>()),
        }
    }

    /// The concrete kind behind a type-erased sender
    pub fn of_dyn(sender: &dyn Any) -> Self {
        Self::from_type_id((*sender).type_id())
    }

    /// A kind known only by its type ID
    pub fn from_type_id(id: TypeId) -> Self {
        Self { id, name: None }
    }

    /// Type name, if the kind was built from a type
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }
}

impl PartialEq for SenderKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SenderKind {}

impl Hash for SenderKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for SenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{:?}", self.id),
        }
    }
}

/// Which senders a subscription listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SenderFilter {
    /// Every sender, including anonymous publishes
    #[default]
    Any,
    /// Only senders of one concrete type
    Kind(SenderKind),
}

impl SenderFilter {
    /// Filter on senders of type `S`
    pub fn of<S: Any>() -> Self {
        SenderFilter::Kind(SenderKind::of::<S>())
    }

    /// Check if this is the "any sender" sentinel
    pub fn is_any(&self) -> bool {
        matches!(self, SenderFilter::Any)
    }
}

impl From<SenderKind> for SenderFilter {
    fn from(kind: SenderKind) -> Self {
        SenderFilter::Kind(kind)
    }
}

impl fmt::Display for SenderFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SenderFilter::Any => write!(f, "*"),
            SenderFilter::Kind(kind) => write!(f, "{}", kind),
        }
    }
}

/// Key of one topic: a message kind plus a sender filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopicKey {
    /// Kind of message routed through the topic
    pub message: MessageKind,
    /// Senders the topic is restricted to
    pub sender: SenderFilter,
}

impl TopicKey {
    /// Create a topic key
    pub fn new(message: MessageKind, sender: SenderFilter) -> Self {
        Self { message, sender }
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.sender, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Button;
    struct Slider;

    #[test]
    fn test_message_kind_identity() {
        assert_eq!(MessageKind::of::<String>(), MessageKind::of::<String>());
        assert_ne!(MessageKind::of::<String>(), MessageKind::of::<&'static str>());
        assert!(MessageKind::of::<String>().name().ends_with("String"));
    }

    #[test]
    fn test_sender_kind_of_dyn() {
        let boxed: Box<dyn Any + Send + Sync> = Box::new(Button);
        let kind = SenderKind::of_dyn(&*boxed);
        assert_eq!(kind, SenderKind::of::<Button>());
        assert_ne!(kind, SenderKind::of::<Slider>());
        assert_eq!(kind.name(), None);
        assert!(SenderKind::of::<Button>().name().unwrap().ends_with("Button"));
        assert_eq!(
            SenderFilter::Kind(kind),
            SenderFilter::of::<Button>(),
            "runtime and static kinds must key the same topic"
        );
    }

    #[test]
    fn test_sender_filter() {
        assert!(SenderFilter::default().is_any());
        assert!(!SenderFilter::of::<Button>().is_any());
        assert_eq!(
            SenderFilter::from(SenderKind::of::<Button>()),
            SenderFilter::of::<Button>()
        );
        assert_eq!(format!("{}", SenderFilter::Any), "*");
    }

    #[test]
    fn test_topic_keys_differ_by_filter() {
        let any = TopicKey::new(MessageKind::of::<u32>(), SenderFilter::Any);
        let filtered = TopicKey::new(MessageKind::of::<u32>(), SenderFilter::of::<Button>());
        assert_ne!(any, filtered);
        assert_eq!(any.message, filtered.message);
        assert!(format!("{}", any).starts_with("*::"));
    }
}
