//! Inbound and outbound exchange handles.
//!
//! The pipeline only needs two capabilities from the transport:
//! - [`Inbound`]: open the request body as a readable stream
//! - [`Outbound`]: write a status code and a body, once
//!
//! [`ResponseRecorder`] is an in-memory [`Outbound`] used by the axum
//! integration and by tests.

use bytes::{Buf, Bytes};
use http::{Request, Response, StatusCode};
use std::io::{self, Read};

/// Source of the request body.
///
/// The returned body is released when it is dropped.
pub trait Inbound {
    /// Readable body stream.
    type Body: Read;

    /// Open the body stream.
    fn open_body(&mut self) -> io::Result<Self::Body>;
}

/// Buffered HTTP requests hand out their body once; later opens read nothing.
impl Inbound for Request<Bytes> {
    type Body = bytes::buf::Reader<Bytes>;

    fn open_body(&mut self) -> io::Result<Self::Body> {
        Ok(std::mem::take(self.body_mut()).reader())
    }
}

/// Wraps any reader as a single-use request body.
///
/// ```rust
/// use respond::{BodyReader, Inbound};
///
/// let mut source = BodyReader::new(&b"{}"[..]);
/// assert!(source.open_body().is_ok());
/// assert!(source.open_body().is_err());
/// ```
#[derive(Debug)]
pub struct BodyReader<R> {
    inner: Option<R>,
}

impl<R: Read> BodyReader<R> {
    /// Create a body source from a reader.
    pub fn new(reader: R) -> Self {
        Self {
            inner: Some(reader),
        }
    }

    /// Returns whether the body has already been opened.
    pub fn is_consumed(&self) -> bool {
        self.inner.is_none()
    }
}

impl<R: Read> Inbound for BodyReader<R> {
    type Body = R;

    fn open_body(&mut self) -> io::Result<R> {
        self.inner
            .take()
            .ok_or_else(|| io::Error::other("request body already consumed"))
    }
}

/// Destination of the single response write.
pub trait Outbound {
    /// Transport-level write failure.
    type Error: std::error::Error;

    /// Write the status code and the full body.
    fn write(&mut self, status: StatusCode, body: Bytes) -> Result<(), Self::Error>;
}

impl<O: Outbound + ?Sized> Outbound for &mut O {
    type Error = O::Error;

    fn write(&mut self, status: StatusCode, body: Bytes) -> Result<(), Self::Error> {
        (**self).write(status, body)
    }
}

/// Errors returned by [`ResponseRecorder`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    /// A response was already written to this recorder.
    #[error("response already written with status {0}")]
    AlreadyWritten(StatusCode),
}

/// In-memory response that accepts exactly one write.
#[derive(Debug, Default, Clone)]
pub struct ResponseRecorder {
    status: Option<StatusCode>,
    body: Bytes,
}

impl ResponseRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The written status, or `None` before the write.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// The written body (empty before the write).
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns whether a response has been written.
    pub fn is_written(&self) -> bool {
        self.status.is_some()
    }

    /// Convert into an HTTP response.
    ///
    /// An unwritten recorder becomes an empty `200 OK`.
    pub fn into_http_response(self) -> Response<Bytes> {
        let mut response = Response::new(self.body);
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        response
    }
}

impl Outbound for ResponseRecorder {
    type Error = WriteError;

    fn write(&mut self, status: StatusCode, body: Bytes) -> Result<(), WriteError> {
        if let Some(existing) = self.status {
            return Err(WriteError::AlreadyWritten(existing));
        }
        self.status = Some(status);
        self.body = body;
        Ok(())
    }
}
