//! Login server built on a respond pipeline.
//!
//! One handler reads the body, decodes the credentials, issues a token and
//! encodes it. Malformed JSON answers 400, everything else that fails
//! answers 500 with the error text.
//!
//! Run with: cargo run --bin login
//! Test with:
//!   curl -X POST http://localhost:3000/login -d '{"username":"alice","password":"password"}'

use axum::{
    Extension, Router,
    response::{IntoResponse, Response},
    routing::post,
};
use respond::prelude::*;
use respond::{MessageLimits, PipelineConfig};
use respond_examples::{LoginRequest, Session, server_addr};
use tracing_subscriber::EnvFilter;

async fn login(mut req: BufferedRequest) -> Response {
    let mut credentials = LoginRequest::default();
    let mut session = Session::default();

    req.pipeline()
        .read_body()
        .decode_request(&mut credentials)
        .run(|| {
            if credentials.password != "password" {
                return Err(PipelineError::custom("invalid credentials"));
            }
            session.token = format!("session-{}", credentials.username);
            tracing::info!(username = %credentials.username, "issued session");
            Ok(())
        })
        .encode_response(&session)
        .into_response()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,respond=debug")),
        )
        .init();

    let config = PipelineConfig::new().limits(MessageLimits::new().receive_max_bytes(64 * 1024));
    let app = Router::new()
        .route("/login", post(login))
        .layer(Extension(config));

    let addr = server_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
