//! Pipeline failure kinds and the error type recorded by a pipeline.
//!
//! - [`Kind`]: closed classification of failures, mapped to HTTP status codes
//! - [`PipelineError`]: the failure record, one variant per [`Kind`]

use http::StatusCode;

/// Boxed error used for failures produced outside this crate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure kinds a pipeline can record.
///
/// The set is closed: every kind is explicitly slotted into a client-error
/// or server-error status by [`Kind::status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Reading the inbound body failed.
    Read,
    /// The payload is not syntactically valid structured data.
    DecodeSyntax,
    /// The payload is not valid text in the expected encoding.
    DecodeEncoding,
    /// The payload is well-formed but does not match the target type.
    DecodeSchema,
    /// The response value could not be serialized.
    Encode,
    /// A caller-supplied step failed.
    Custom,
}

impl Kind {
    /// Get the string representation of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Read => "read",
            Kind::DecodeSyntax => "decode_syntax",
            Kind::DecodeEncoding => "decode_encoding",
            Kind::DecodeSchema => "decode_schema",
            Kind::Encode => "encode",
            Kind::Custom => "custom",
        }
    }

    /// Returns whether this kind is blamed on the client.
    ///
    /// Only malformed syntax and invalid text encoding are client errors.
    /// Schema mismatches are treated as server errors.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Kind::DecodeSyntax | Kind::DecodeEncoding)
    }

    /// The status code written when a pipeline finalizes with this kind.
    ///
    /// ```
    /// use http::StatusCode;
    /// use respond_core::Kind;
    ///
    /// assert_eq!(Kind::DecodeSyntax.status(), StatusCode::BAD_REQUEST);
    /// assert_eq!(Kind::Custom.status(), StatusCode::INTERNAL_SERVER_ERROR);
    /// ```
    pub fn status(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure recorded by a pipeline step.
///
/// The `Display` output is the text written as the response body when the
/// pipeline finalizes.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Reading the inbound body failed.
    #[error("failed to read request body: {0}")]
    Read(#[source] std::io::Error),

    /// Malformed structured-data syntax.
    #[error("{0}")]
    DecodeSyntax(#[source] BoxError),

    /// Invalid text encoding in the payload.
    #[error("{0}")]
    DecodeEncoding(#[source] BoxError),

    /// Well-formed payload with the wrong shape.
    #[error("{0}")]
    DecodeSchema(#[source] BoxError),

    /// Response serialization failed.
    #[error("{0}")]
    Encode(#[source] BoxError),

    /// A caller-supplied step failed.
    #[error("{0}")]
    Custom(#[source] BoxError),
}

impl PipelineError {
    /// Create a custom step failure from any error or message.
    ///
    /// ```
    /// use respond_core::{Kind, PipelineError};
    ///
    /// let err = PipelineError::custom("token service unavailable");
    /// assert_eq!(err.kind(), Kind::Custom);
    /// assert_eq!(err.to_string(), "token service unavailable");
    /// ```
    pub fn custom<E: Into<BoxError>>(err: E) -> Self {
        PipelineError::Custom(err.into())
    }

    /// Create an encode failure from any error or message.
    pub fn encode<E: Into<BoxError>>(err: E) -> Self {
        PipelineError::Encode(err.into())
    }

    /// Get the failure kind.
    pub fn kind(&self) -> Kind {
        match self {
            PipelineError::Read(_) => Kind::Read,
            PipelineError::DecodeSyntax(_) => Kind::DecodeSyntax,
            PipelineError::DecodeEncoding(_) => Kind::DecodeEncoding,
            PipelineError::DecodeSchema(_) => Kind::DecodeSchema,
            PipelineError::Encode(_) => Kind::Encode,
            PipelineError::Custom(_) => Kind::Custom,
        }
    }

    /// The status code written for this failure.
    ///
    /// Convenience wrapper for [`Kind::status()`].
    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Read(err)
    }
}
