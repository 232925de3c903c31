//! Dispatcher configuration
//!
//! Controls when emptied topics are dropped from the registry and how the
//! dispatcher labels its tracing events. Configuration is plain serde data
//! and can be read from RON text.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// When to drop topics whose subscriber list became empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrunePolicy {
    /// Only the unsubscribe scoped to one exact topic drops it
    ///
    /// The unscoped variants leave empty topics in place for reuse.
    #[default]
    ScopedOnly,
    /// Every unsubscribe variant drops the topics it empties
    Always,
}

/// Configuration for a [`Dispatcher`](crate::Dispatcher)
///
/// # Example
///
/// ```
/// use tidings_bus::{DispatcherConfig, PrunePolicy};
///
/// let config = DispatcherConfig::default();
/// assert_eq!(config.prune, PrunePolicy::ScopedOnly);
///
/// let config = DispatcherConfig::from_ron("(prune: Always, label: \"ui\")").unwrap();
/// assert_eq!(config.prune, PrunePolicy::Always);
/// assert_eq!(config.label, "ui");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Pruning of emptied topics
    pub prune: PrunePolicy,
    /// Name recorded on the dispatcher's tracing events
    pub label: String,
}

impl DispatcherConfig {
    /// Create a configuration with the given prune policy
    pub fn with_prune(prune: PrunePolicy) -> Self {
        Self {
            prune,
            ..Self::default()
        }
    }

    /// Set the tracing label
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Parse a configuration from RON text
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Check if unscoped unsubscribes should prune too
    pub fn prunes_always(&self) -> bool {
        self.prune == PrunePolicy::Always
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            prune: PrunePolicy::ScopedOnly,
            label: "default".to_string(),
        }
    }
}
