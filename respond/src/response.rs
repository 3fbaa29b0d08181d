//! axum response conversion for pipelines.
use crate::exchange::{Inbound, ResponseRecorder};
use crate::pipeline::Pipeline;
use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use respond_core::Codec;

const TEXT_PLAIN_UTF_8: &str = "text/plain; charset=utf-8";

/// Finalizes the pipeline into an axum response.
///
/// Successful responses carry the codec's content type; failures carry the
/// error text as `text/plain`.
impl<I, C> IntoResponse for Pipeline<'_, I, C>
where
    I: Inbound,
    C: Codec,
{
    fn into_response(self) -> Response {
        let content_type = self.codec().content_type();
        let mut recorder = ResponseRecorder::new();

        let content_type = match self.finalize(&mut recorder) {
            Ok(outcome) if outcome.is_success() => content_type,
            Ok(_) => TEXT_PLAIN_UTF_8,
            // a fresh recorder accepts its first write
            Err(err) => {
                tracing::warn!(error = %err, "pipeline response was not recorded");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        let (mut parts, body) = recorder.into_http_response().into_parts();
        parts
            .headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        Response::from_parts(parts, Body::from(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::BodyExt;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    struct Login {
        username: String,
    }

    async fn body_bytes(response: Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_success_response() {
        let mut req = http::Request::new(Bytes::from_static(br#"{"username":"alice"}"#));
        let mut login = Login::default();

        let response = Pipeline::new(&mut req)
            .read_body()
            .decode_request(&mut login)
            .encode_response(&login.username)
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_bytes(response).await, Bytes::from_static(b"\"alice\""));
    }

    #[tokio::test]
    async fn test_error_response() {
        let mut req = http::Request::new(Bytes::from_static(b"{"));
        let mut login = Login::default();

        let response = Pipeline::new(&mut req)
            .read_body()
            .decode_request(&mut login)
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            TEXT_PLAIN_UTF_8
        );
        let body = body_bytes(response).await;
        assert!(std::str::from_utf8(&body).unwrap().contains("EOF"));
    }
}
