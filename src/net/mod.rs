//! Networking: the HTTP transport seam and the typed session client.
//!
//! The library never opens sockets itself. The firmware implements
//! [`HttpTransport`] on top of `embassy-net` + `reqwless`; tests use a
//! scripted fake. Everything above the transport (URL building, status
//! checks, JSON decoding) lives in [`client::SessionClient`].

pub mod api;
pub mod client;

pub use api::{ScoreEntry, SessionSnapshot, SessionStatus, SessionSummary};
pub use client::SessionClient;

use alloc::vec::Vec;

use crate::error::TransportError;

/// Status code and raw body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Minimal blocking-style HTTP client.
///
/// `url` is absolute (scheme, host, path and query). Implementations return
/// any status code as `Ok`; only transport failures are errors.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    async fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError>;

    /// POST `body` with `Content-Type: application/json`.
    async fn post_json(&mut self, url: &str, body: &[u8]) -> Result<HttpResponse, TransportError>;
}
