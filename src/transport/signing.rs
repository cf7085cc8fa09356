//! Credential-signing transport

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Request;
use std::sync::Arc;

use super::logging::{render_request, render_response, WireLogger};
use super::{Credentials, RawResponse, Transporter};
use crate::error::{BoxError, Error, Result};

/// Header carrying the API key (`X-Api-Key`)
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Header carrying the API secret key (`X-Api-Secret-Key`)
pub const SECRET_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-secret-key");

/// Wraps a [`Transporter`] and signs every request
///
/// Sets `Accept: application/json`, both authentication headers and the
/// `User-Agent` unconditionally. With a [`WireLogger`] attached, one record
/// is emitted for the request and one for the response.
#[derive(Clone)]
pub struct SigningTransport {
    inner: Arc<dyn Transporter>,
    api_key: HeaderValue,
    secret_key: HeaderValue,
    user_agent: HeaderValue,
    logger: Option<Arc<dyn WireLogger>>,
}

impl std::fmt::Debug for SigningTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningTransport")
            .field("user_agent", &self.user_agent)
            .field("logging", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

impl SigningTransport {
    /// Create a signing transport
    ///
    /// # Errors
    /// [`Error::Configuration`] if a credential or the user agent is not a
    /// valid header value.
    pub fn new(
        inner: Arc<dyn Transporter>,
        credentials: &Credentials,
        user_agent: &str,
        logger: Option<Arc<dyn WireLogger>>,
    ) -> Result<Self> {
        let mut secret_key = header_value("secret key", credentials.secret_key())?;
        secret_key.set_sensitive(true);
        let mut api_key = header_value("api key", credentials.api_key())?;
        api_key.set_sensitive(true);

        Ok(Self {
            inner,
            api_key,
            secret_key,
            user_agent: header_value("user agent", user_agent)?,
            logger,
        })
    }

    /// The `User-Agent` sent with every request
    pub fn user_agent(&self) -> &str {
        self.user_agent.to_str().unwrap_or_default()
    }

    /// Whether request logging is enabled
    pub fn logs_requests(&self) -> bool {
        self.logger.is_some()
    }

    /// Sign and send `request`
    pub async fn send(&self, mut request: Request) -> std::result::Result<RawResponse, BoxError> {
        let headers = request.headers_mut();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, self.api_key.clone());
        headers.insert(SECRET_KEY_HEADER, self.secret_key.clone());
        headers.insert(USER_AGENT, self.user_agent.clone());

        let Some(logger) = &self.logger else {
            return self.inner.round_trip(request).await;
        };

        logger.log(&render_request(&request));
        let response = self.inner.round_trip(request).await?;
        logger.log(&render_response(&response));
        Ok(response)
    }
}

#[async_trait]
impl Transporter for SigningTransport {
    async fn round_trip(&self, request: Request) -> std::result::Result<RawResponse, BoxError> {
        self.send(request).await
    }
}

fn header_value(what: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::Configuration(format!("invalid {what} header value: {e}")))
}
