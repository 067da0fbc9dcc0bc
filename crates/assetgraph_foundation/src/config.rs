//! Configuration for a registry instance.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a registry.
///
/// Controls diagnostics only; storage behavior is fixed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegistryConfig {
    /// Label recorded on every log event emitted by the registry.
    pub label: String,

    /// Property count past which a `warn` event is emitted for an object.
    /// Lookups are linear scans, so objects are expected to stay small.
    pub property_warn_threshold: usize,

    /// Emit a `debug` event for every created object.
    pub log_creations: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            label: "registry".to_string(),
            property_warn_threshold: 256,
            log_creations: true,
        }
    }
}

impl RegistryConfig {
    /// Creates a configuration that never logs creations, for bulk imports.
    #[must_use]
    pub fn quiet() -> Self {
        Self {
            log_creations: false,
            ..Self::default()
        }
    }

    /// Builder method to set the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Builder method to set the property warning threshold.
    #[must_use]
    pub fn with_property_warn_threshold(mut self, threshold: usize) -> Self {
        self.property_warn_threshold = threshold;
        self
    }

    /// Builder method to enable/disable creation logging.
    #[must_use]
    pub fn with_log_creations(mut self, log: bool) -> Self {
        self.log_creations = log;
        self
    }
}
