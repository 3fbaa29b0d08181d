//! Message size limits for pipeline requests and responses.
//!
//! # Receive vs Send Limits
//!
//! - **Receive limit** (`receive_max_bytes`): Limits the inbound body read by
//!   [`Pipeline::read_body`](crate::Pipeline::read_body).
//!
//! - **Send limit** (`send_max_bytes`): Limits the encoded response produced by
//!   [`Pipeline::encode_response`](crate::Pipeline::encode_response).

use respond_core::PipelineError;

/// Configuration for message size limits.
///
/// By default, no limits are applied. Use the builder methods to set limits.
///
/// # Example
///
/// ```rust
/// use respond::MessageLimits;
///
/// // Set receive limit only
/// let limits = MessageLimits::new().receive_max_bytes(4 * 1024 * 1024);
///
/// // Set both receive and send limits
/// let limits = MessageLimits::new()
///     .receive_max_bytes(16 * 1024 * 1024)  // 16 MB for requests
///     .send_max_bytes(8 * 1024 * 1024);     // 8 MB for responses
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MessageLimits {
    /// Maximum size of inbound bodies in bytes.
    receive_max_bytes: Option<usize>,
    /// Maximum size of encoded responses in bytes.
    send_max_bytes: Option<usize>,
}

impl MessageLimits {
    /// Create new limits with no restrictions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum size for inbound bodies.
    ///
    /// A larger body fails the read step with a `Read` failure.
    pub fn receive_max_bytes(mut self, max: usize) -> Self {
        self.receive_max_bytes = Some(max);
        self
    }

    /// Set the maximum size for encoded responses.
    ///
    /// A larger response fails the encode step with an `Encode` failure.
    pub fn send_max_bytes(mut self, max: usize) -> Self {
        self.send_max_bytes = Some(max);
        self
    }

    /// Returns the maximum receive size, or `None` if unlimited.
    pub fn get_receive_max_bytes(&self) -> Option<usize> {
        self.receive_max_bytes
    }

    /// Returns the maximum send size, or `None` if unlimited.
    pub fn get_send_max_bytes(&self) -> Option<usize> {
        self.send_max_bytes
    }

    /// Returns the maximum receive size for use with `axum::body::to_bytes`.
    ///
    /// Returns `usize::MAX` if unlimited.
    pub fn receive_max_bytes_or_max(&self) -> usize {
        self.receive_max_bytes.unwrap_or(usize::MAX)
    }

    /// Check an inbound body size against the receive limit.
    pub fn check_receive_size(&self, size: usize) -> Result<(), PipelineError> {
        if let Some(max) = self.receive_max_bytes
            && size > max
        {
            return Err(PipelineError::Read(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "message size {} bytes exceeds maximum allowed size of {} bytes",
                    size, max
                ),
            )));
        }
        Ok(())
    }

    /// Check an encoded response size against the send limit.
    pub fn check_send_size(&self, size: usize) -> Result<(), PipelineError> {
        if let Some(max) = self.send_max_bytes
            && size > max
        {
            return Err(PipelineError::encode(format!(
                "response size {} bytes exceeds maximum allowed size of {} bytes",
                size, max
            )));
        }
        Ok(())
    }
}
