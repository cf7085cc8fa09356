//! JSON request executor
//!
//! Every call consults the rate limiter, signs and sends the request, maps
//! any status >= 300 to [`Error::Transport`] and decodes the JSON body into
//! the caller's type. The operation name is folded into every error.

use reqwest::{Method, Request, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::config::RATE_LIMIT_REMAINING_HEADER;
use super::rate_limit::RateLimiter;
use crate::error::{Error, Result};
use crate::metrics;
use crate::transport::{RawResponse, SigningTransport};

/// Shared HTTP executor for the control-plane API
///
/// Cheap to clone; clones share the transport, connection pool and rate
/// limiter. Each clone carries its own cancellation token.
#[derive(Clone, Debug)]
pub struct Api {
    shared: Arc<Shared>,
    cancel: CancellationToken,
}

#[derive(Debug)]
struct Shared {
    base_url: Url,
    transport: SigningTransport,
    limiter: RateLimiter,
}

impl Api {
    /// Create an executor over `base_url`
    pub fn new(base_url: Url, transport: SigningTransport, limiter: RateLimiter) -> Self {
        Self {
            shared: Arc::new(Shared {
                base_url,
                transport,
                limiter,
            }),
            cancel: CancellationToken::new(),
        }
    }

    /// A clone whose calls are cancelled when `cancel` fires
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            cancel,
        }
    }

    /// Cancellation token observed by this executor
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Base URL all paths are appended to
    pub fn base_url(&self) -> &Url {
        &self.shared.base_url
    }

    /// The shared rate limiter
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.shared.limiter
    }

    /// The signing transport
    pub fn transport(&self) -> &SigningTransport {
        &self.shared.transport
    }

    /// `GET path`
    pub async fn get<T>(&self, operation: &str, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.execute(operation, Method::GET, path, &[], None).await
    }

    /// `GET path?query`
    pub async fn get_with_query<T>(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.execute(operation, Method::GET, path, query, None).await
    }

    /// `POST path` with a JSON body
    pub async fn post<B, T>(&self, operation: &str, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(operation, body)?;
        self.execute(operation, Method::POST, path, &[], Some(body))
            .await
    }

    /// `PUT path` with a JSON body
    pub async fn put<B, T>(&self, operation: &str, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(operation, body)?;
        self.execute(operation, Method::PUT, path, &[], Some(body))
            .await
    }

    /// `DELETE path`
    pub async fn delete<T>(&self, operation: &str, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.execute(operation, Method::DELETE, path, &[], None)
            .await
    }

    /// `DELETE path` with a JSON body, for the few endpoints that take one
    pub async fn delete_with_body<B, T>(&self, operation: &str, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(operation, body)?;
        self.execute(operation, Method::DELETE, path, &[], Some(body))
            .await
    }

    async fn execute<T>(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.shared
            .limiter
            .wait(&self.cancel)
            .await
            .map_err(|_| Error::Cancelled)?;

        let url = self.url(path, query)?;
        debug!(method = %method, path = %path, "Sending API request");

        let mut request = Request::new(method.clone(), url);
        if let Some(body) = body {
            request.headers_mut().insert(
                reqwest::header::CONTENT_TYPE,
                reqwest::header::HeaderValue::from_static("application/json"),
            );
            *request.body_mut() = Some(body.into());
        }

        let response = tokio::select! {
            response = self.shared.transport.send(request) => {
                response.map_err(|source| Error::Network {
                    operation: operation.to_string(),
                    source,
                })?
            }
            _ = self.cancel.cancelled() => return Err(Error::Cancelled),
        };

        metrics::record_request(method.as_str(), response.status.as_u16());
        self.apply_rate_limit_hint(&response).await;

        debug!(
            method = %method,
            path = %path,
            status = response.status.as_u16(),
            "Received API response"
        );

        if response.status.as_u16() >= 300 {
            return Err(Error::Transport {
                operation: operation.to_string(),
                status: response.status.as_u16(),
                body: response.text(),
            });
        }

        decode(operation, &response)
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let base = self.shared.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{path}"))
            .map_err(|e| Error::Configuration(format!("invalid request path {path}: {e}")))?;

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn apply_rate_limit_hint(&self, response: &RawResponse) {
        let remaining = response
            .headers
            .get(RATE_LIMIT_REMAINING_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok());

        if let Some(remaining) = remaining {
            self.shared.limiter.update(remaining).await;
        }
    }
}

fn encode<B>(operation: &str, body: &B) -> Result<Vec<u8>>
where
    B: Serialize + ?Sized,
{
    serde_json::to_vec(body).map_err(|source| Error::Encode {
        operation: operation.to_string(),
        source,
    })
}

fn decode<T>(operation: &str, response: &RawResponse) -> Result<T>
where
    T: DeserializeOwned,
{
    // Empty bodies decode as JSON null so `()` and `Option<T>` targets succeed.
    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &response.body
    };

    serde_json::from_slice(body).map_err(|source| Error::Decode {
        operation: operation.to_string(),
        source,
    })
}
