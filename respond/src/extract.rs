//! Extractor that buffers the request body for a pipeline.
use crate::config::PipelineConfig;
use crate::exchange::Inbound;
use crate::pipeline::Pipeline;
use axum::extract::{FromRequest, Request};
use bytes::{Buf, Bytes};
use http_body_util::LengthLimitError;
use std::convert::Infallible;
use std::io;

/// A request whose body has been read into memory.
///
/// The pipeline reads bodies synchronously, so the async body is collected
/// here first. The receive limit comes from a [`PipelineConfig`] in the
/// request extensions (for example `Router::layer(Extension(config))`);
/// without one the body is unlimited.
///
/// Extraction never rejects. If collecting the body fails, the error is
/// kept and handed to the pipeline on the first [`Inbound::open_body`],
/// so `read_body` records it as a read failure and finalize answers 500.
///
/// ```ignore
/// async fn login(mut req: BufferedRequest) -> Response {
///     let mut login = Login::default();
///     req.pipeline()
///         .read_body()
///         .decode_request(&mut login)
///         .encode_response(&login.username)
///         .into_response()
/// }
/// ```
#[derive(Debug)]
pub struct BufferedRequest {
    request: http::Request<Bytes>,
    read_error: Option<io::Error>,
}

impl BufferedRequest {
    /// Wrap an already buffered request.
    pub fn new(request: http::Request<Bytes>) -> Self {
        Self {
            request,
            read_error: None,
        }
    }

    /// Configuration found in the request extensions, or the default.
    pub fn config(&self) -> PipelineConfig {
        config_or_default(&self.request)
    }

    /// The buffered request. Its body is empty if collection failed.
    pub fn request(&self) -> &http::Request<Bytes> {
        &self.request
    }

    /// The error hit while collecting the body, if it has not been read yet.
    pub fn read_error(&self) -> Option<&io::Error> {
        self.read_error.as_ref()
    }

    /// Start a JSON pipeline over this request, using its configuration.
    pub fn pipeline(&mut self) -> Pipeline<'_, BufferedRequest> {
        let config = self.config();
        Pipeline::new(self).with_config(config)
    }

    /// Extract the buffered request, dropping any collection error.
    pub fn into_inner(self) -> http::Request<Bytes> {
        self.request
    }
}

/// A failed collection surfaces once; later opens read the empty body.
impl Inbound for BufferedRequest {
    type Body = bytes::buf::Reader<Bytes>;

    fn open_body(&mut self) -> io::Result<Self::Body> {
        if let Some(err) = self.read_error.take() {
            return Err(err);
        }
        Ok(std::mem::take(self.request.body_mut()).reader())
    }
}

impl<S> FromRequest<S> for BufferedRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let limits = config_or_default(&req).limits;
        let (parts, body) = req.into_parts();

        match axum::body::to_bytes(body, limits.receive_max_bytes_or_max()).await {
            Ok(bytes) => Ok(BufferedRequest::new(http::Request::from_parts(parts, bytes))),
            Err(e) => {
                let err = if is_length_limit(&e) {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!(
                            "message size exceeds maximum allowed size of {} bytes",
                            limits.receive_max_bytes_or_max()
                        ),
                    )
                } else {
                    io::Error::other(e)
                };
                tracing::debug!(error = %err, "failed to buffer request body");
                Ok(BufferedRequest {
                    request: http::Request::from_parts(parts, Bytes::new()),
                    read_error: Some(err),
                })
            }
        }
    }
}

fn config_or_default<B>(req: &http::Request<B>) -> PipelineConfig {
    req.extensions()
        .get::<PipelineConfig>()
        .copied()
        .unwrap_or_default()
}

fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}
