//! The request/response pipeline.
//!
//! A [`Pipeline`] threads one exchange through a chain of fallible steps:
//! - [`read_body`](Pipeline::read_body): read the inbound body
//! - [`decode_request`](Pipeline::decode_request): decode it into a value
//! - [`run`](Pipeline::run): run caller-supplied work
//! - [`encode_response`](Pipeline::encode_response): encode the response value
//! - [`finalize`](Pipeline::finalize): write the outcome, exactly once
//!
//! The first failing step is recorded and every later step becomes a no-op.
//! Classification of the failure into a status code happens only in
//! `finalize`.
//!
//! # Example
//!
//! ```rust
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//! use respond::{Pipeline, ResponseRecorder};
//! use serde::Deserialize;
//!
//! #[derive(Default, Deserialize)]
//! struct Login {
//!     username: String,
//! }
//!
//! let mut req = Request::new(Bytes::from_static(br#"{"username":"alice"}"#));
//! let mut login = Login::default();
//! let mut greeting = String::new();
//! let mut recorder = ResponseRecorder::new();
//!
//! let outcome = Pipeline::new(&mut req)
//!     .read_body()
//!     .decode_request(&mut login)
//!     .run(|| {
//!         greeting = format!("hello {}", login.username);
//!         Ok::<_, std::io::Error>(())
//!     })
//!     .encode_response(&greeting)
//!     .finalize(&mut recorder)
//!     .unwrap();
//!
//! assert_eq!(outcome.status(), StatusCode::OK);
//! assert_eq!(recorder.body(), &Bytes::from_static(br#""hello alice""#));
//! ```

use crate::config::PipelineConfig;
use crate::exchange::{Inbound, Outbound};
use crate::limits::MessageLimits;
use bytes::Bytes;
use http::StatusCode;
use respond_core::{BoxError, Codec, JsonCodec, PipelineError};
use serde::{Serialize, de::DeserializeOwned};
use std::io::Read;

/// Per-exchange pipeline state.
///
/// Every step consumes the pipeline and returns it, so a handler is written
/// as one chain ending in [`finalize`](Pipeline::finalize).
pub struct Pipeline<'a, I, C = JsonCodec> {
    source: &'a mut I,
    codec: C,
    config: PipelineConfig,
    first_error: Option<PipelineError>,
    request_bytes: Option<Bytes>,
    response_bytes: Option<Bytes>,
    steps: usize,
}

impl<'a, I: Inbound> Pipeline<'a, I> {
    /// Create a pipeline over `source` using the JSON codec.
    pub fn new(source: &'a mut I) -> Self {
        Self::with_codec(source, JsonCodec)
    }
}

impl<'a, I: Inbound, C: Codec> Pipeline<'a, I, C> {
    /// Create a pipeline over `source` using `codec`.
    pub fn with_codec(source: &'a mut I, codec: C) -> Self {
        Self {
            source,
            codec,
            config: PipelineConfig::default(),
            first_error: None,
            request_bytes: None,
            response_bytes: None,
            steps: 0,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// The first recorded failure, if any.
    pub fn error(&self) -> Option<&PipelineError> {
        self.first_error.as_ref()
    }

    /// Returns whether a step has failed.
    pub fn is_failed(&self) -> bool {
        self.first_error.is_some()
    }

    /// Number of steps attempted, including the one that failed.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Bytes read by [`read_body`](Pipeline::read_body).
    pub fn request_bytes(&self) -> Option<&Bytes> {
        self.request_bytes.as_ref()
    }

    /// Bytes produced by [`encode_response`](Pipeline::encode_response).
    pub fn response_bytes(&self) -> Option<&Bytes> {
        self.response_bytes.as_ref()
    }

    /// The codec in use.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// The configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run a caller-supplied step.
    ///
    /// `action` runs at most once, and only if no earlier step failed. An
    /// error it returns is recorded as a custom failure.
    pub fn run<F, E>(mut self, action: F) -> Self
    where
        F: FnOnce() -> Result<(), E>,
        E: Into<BoxError>,
    {
        if self.skip("run") {
            return self;
        }
        let result = action().map_err(PipelineError::custom);
        self.record("run", result);
        self
    }

    /// Read the whole inbound body.
    ///
    /// The body stream is released before this returns, whether the read
    /// succeeds or fails.
    pub fn read_body(mut self) -> Self {
        if self.skip("read_body") {
            return self;
        }
        let result = read_all(&mut *self.source, self.config.limits).map(|bytes| {
            self.request_bytes = Some(bytes);
        });
        self.record("read_body", result);
        self
    }

    /// Decode the request bytes into `target`.
    ///
    /// Decoding before [`read_body`](Pipeline::read_body) decodes an empty
    /// payload, which fails as a syntax error.
    pub fn decode_request<T>(mut self, target: &mut T) -> Self
    where
        T: DeserializeOwned,
    {
        if self.skip("decode_request") {
            return self;
        }
        let bytes = self.request_bytes.as_deref().unwrap_or_default();
        let result = self.codec.decode::<T>(bytes).map(|value| *target = value);
        self.record("decode_request", result);
        self
    }

    /// Encode `value` as the response body.
    pub fn encode_response<T>(mut self, value: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        if self.skip("encode_response") {
            return self;
        }
        let limits = self.config.limits;
        let result = self
            .codec
            .encode(value)
            .and_then(|bytes| {
                limits.check_send_size(bytes.len())?;
                Ok(bytes)
            })
            .map(|bytes| {
                self.response_bytes = Some(bytes);
            });
        self.record("encode_response", result);
        self
    }

    /// Write the outcome to `destination`, exactly once.
    ///
    /// - no failure: `200 OK` with the encoded response (empty if nothing was encoded)
    /// - syntax or text-encoding decode failure: `400 Bad Request` with the error text
    /// - any other failure: `500 Internal Server Error` with the error text
    ///
    /// A failed write is returned as `Err`, separately from any recorded
    /// pipeline failure.
    pub fn finalize<O>(mut self, destination: &mut O) -> Result<Finalized, O::Error>
    where
        O: Outbound + ?Sized,
    {
        let (status, body) = match &self.first_error {
            None => {
                self.steps += 1;
                let body = self.response_bytes.take().unwrap_or_default();
                (StatusCode::OK, body)
            }
            Some(err) => (err.status(), Bytes::from(err.to_string())),
        };

        if let Err(err) = destination.write(status, body) {
            tracing::warn!(
                status = status.as_u16(),
                error = %err,
                "failed to write pipeline response"
            );
            return Err(err);
        }

        Ok(Finalized {
            status,
            steps: self.steps,
            error: self.first_error,
        })
    }

    fn skip(&self, step: &'static str) -> bool {
        match &self.first_error {
            Some(err) => {
                tracing::trace!(step, kind = %err.kind(), "skipping step after earlier failure");
                true
            }
            None => false,
        }
    }

    fn record(&mut self, step: &'static str, result: Result<(), PipelineError>) {
        self.steps += 1;
        if let Err(err) = result {
            tracing::debug!(
                step,
                steps = self.steps,
                codec = self.codec.name(),
                kind = %err.kind(),
                error = %err,
                "pipeline step failed"
            );
            self.first_error = Some(err);
        }
    }
}

impl<I, C> std::fmt::Debug for Pipeline<'_, I, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.steps)
            .field("first_error", &self.first_error)
            .field("request_len", &self.request_bytes.as_ref().map(Bytes::len))
            .field("response_len", &self.response_bytes.as_ref().map(Bytes::len))
            .finish_non_exhaustive()
    }
}

/// Outcome of a successful [`Pipeline::finalize`] write.
#[derive(Debug)]
pub struct Finalized {
    status: StatusCode,
    steps: usize,
    error: Option<PipelineError>,
}

impl Finalized {
    /// The status code that was written.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Steps attempted, counting a successful write as one.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The recorded pipeline failure, if any.
    pub fn error(&self) -> Option<&PipelineError> {
        self.error.as_ref()
    }

    /// Returns whether the pipeline completed without a failure.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Extract the recorded pipeline failure.
    pub fn into_error(self) -> Option<PipelineError> {
        self.error
    }
}

/// Read the whole body, holding the stream only for the duration of the call.
fn read_all<I: Inbound>(source: &mut I, limits: MessageLimits) -> Result<Bytes, PipelineError> {
    let mut body = source.open_body()?;
    let mut buf = Vec::new();
    match limits.get_receive_max_bytes() {
        Some(max) => {
            // one byte past the limit is enough to detect an oversized body
            let cap = (max as u64).saturating_add(1);
            (&mut body).take(cap).read_to_end(&mut buf)?;
            limits.check_receive_size(buf.len())?;
        }
        None => {
            body.read_to_end(&mut buf)?;
        }
    }
    Ok(Bytes::from(buf))
}
