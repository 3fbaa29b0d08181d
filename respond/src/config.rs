//! Pipeline configuration.
//!
//! Usually built once at startup and copied into each pipeline.

use crate::limits::MessageLimits;

/// Settings applied to every step of a pipeline.
///
/// ```rust
/// use respond::{MessageLimits, PipelineConfig};
///
/// let config = PipelineConfig::new().limits(MessageLimits::new().receive_max_bytes(64 * 1024));
/// assert_eq!(config.limits.get_receive_max_bytes(), Some(64 * 1024));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Message size limits
    pub limits: MessageLimits,
}

impl PipelineConfig {
    /// Create a configuration with no limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message size limits.
    pub fn limits(mut self, limits: MessageLimits) -> Self {
        self.limits = limits;
        self
    }
}
