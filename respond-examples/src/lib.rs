use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Login request body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued session.
#[derive(Debug, Default, Serialize)]
pub struct Session {
    pub token: String,
}

/// Returns the server address from PORT env var, defaulting to 3000.
pub fn server_addr() -> anyhow::Result<SocketAddr> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    Ok(format!("0.0.0.0:{port}").parse()?)
}
