//! Outbound HTTP transport
//!
//! - [`Transporter`] - pluggable lower layer; implemented for [`reqwest::Client`]
//! - [`SigningTransport`] - adds credentials, `Accept` and `User-Agent` to every
//!   request and optionally records a redacted transcript
//! - [`logging`] - transcript rendering and the [`WireLogger`] sink

use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use reqwest::header::HeaderMap;
use reqwest::{Request, StatusCode, Version};
use std::fmt;

use crate::error::BoxError;

pub mod logging;
pub mod signing;

pub use logging::{TracingWireLogger, WireLogger};
pub use signing::SigningTransport;

/// A fully buffered HTTP response
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Response status
    pub status: StatusCode,
    /// HTTP version of the response
    pub version: Version,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
}

impl RawResponse {
    /// Build a response with no headers, mostly useful for scripted transports.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Body as lossy UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Lower-layer HTTP round tripper
///
/// Swap this out to run the client against a scripted transport in tests.
#[async_trait]
pub trait Transporter: Send + Sync {
    /// Send `request` and buffer the whole response.
    async fn round_trip(&self, request: Request) -> Result<RawResponse, BoxError>;
}

#[async_trait]
impl Transporter for reqwest::Client {
    async fn round_trip(&self, request: Request) -> Result<RawResponse, BoxError> {
        let response = self.execute(request).await?;
        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(RawResponse {
            status,
            version,
            headers,
            body,
        })
    }
}

/// API credentials
///
/// Immutable after construction. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    secret_key: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// The API (account) key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

static BASE_USER_AGENT: Lazy<String> = Lazy::new(|| {
    format!(
        "{}/{} (rust; {}; {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
});

/// Compose the `User-Agent` value: `<product>/<version> (<runtime>; <os>; <arch>)`
/// followed by any caller-supplied suffixes.
pub fn user_agent(additional: &[String]) -> String {
    let mut agent = BASE_USER_AGENT.clone();
    for suffix in additional.iter().filter(|s| !s.trim().is_empty()) {
        agent.push(' ');
        agent.push_str(suffix.trim());
    }
    agent
}
