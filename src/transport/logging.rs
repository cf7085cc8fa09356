//! Request/response transcript rendering with password redaction
//!
//! Records look like an HTTP/1.1 dump: a request or status line, a small set
//! of representative headers, a blank line, then the body. JSON bodies are
//! pretty-printed with two-space indentation and every field named
//! `password` is replaced with `"REDACTED"`. Authentication headers are
//! never rendered.

use reqwest::header::{self, HeaderMap, HeaderName};
use reqwest::Request;
use serde_json::Value;

use super::signing::{API_KEY_HEADER, SECRET_KEY_HEADER};
use super::RawResponse;

/// Replacement value for redacted fields
pub const REDACTED: &str = "REDACTED";

const REDACTED_FIELDS: &[&str] = &["password"];

/// Sink receiving one record per logged request and response
pub trait WireLogger: Send + Sync {
    /// Consume one rendered transcript record.
    fn log(&self, record: &str);
}

/// Default sink forwarding records to `tracing` at DEBUG
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingWireLogger;

impl WireLogger for TracingWireLogger {
    fn log(&self, record: &str) {
        tracing::debug!(target: "rediscloud_api::wire", "{record}");
    }
}

/// Render an outbound request
pub fn render_request(request: &Request) -> String {
    let url = request.url();
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut out = format!("{} {} HTTP/1.1\r\n", request.method(), target);

    if let Some(host) = url.host_str() {
        match url.port() {
            Some(port) => push_header(&mut out, "Host", &format!("{host}:{port}")),
            None => push_header(&mut out, "Host", host),
        }
    }
    push_existing(&mut out, request.headers(), &header::USER_AGENT, "User-Agent");

    let body = request.body().and_then(|b| b.as_bytes()).unwrap_or_default();
    if !body.is_empty() {
        push_header(&mut out, "Content-Length", &body.len().to_string());
    }
    push_existing(&mut out, request.headers(), &header::ACCEPT, "Accept");
    push_existing(
        &mut out,
        request.headers(),
        &header::ACCEPT_ENCODING,
        "Accept-Encoding",
    );

    out.push_str("\r\n");
    out.push_str(&format_body(body));
    out
}

/// Render a buffered response
pub fn render_response(response: &RawResponse) -> String {
    let mut out = format!(
        "{:?} {} {}\r\n",
        response.version,
        response.status.as_u16(),
        response.status.canonical_reason().unwrap_or("")
    );

    push_existing(
        &mut out,
        &response.headers,
        &header::CONTENT_TYPE,
        "Content-Type",
    );
    if !response.body.is_empty() {
        push_header(&mut out, "Content-Length", &response.body.len().to_string());
    }
    push_header(&mut out, "Connection", "close");

    let mut extra: Vec<(&str, &str)> = response
        .headers
        .iter()
        .filter(|(name, _)| name.as_str().starts_with("x-") && !is_auth_header(name))
        .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)))
        .collect();
    extra.sort();
    for (name, value) in extra {
        push_header(&mut out, name, value);
    }

    out.push_str("\r\n");
    out.push_str(&format_body(&response.body));
    out
}

/// Pretty-print a JSON body with secrets redacted; non-JSON passes through as text.
pub fn format_body(body: &[u8]) -> String {
    if body.is_empty() {
        return String::new();
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(mut value) => {
            redact(&mut value);
            serde_json::to_string_pretty(&value)
                .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned())
        }
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}

/// Replace every redacted field, at any depth, with [`REDACTED`].
pub fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *field = Value::String(REDACTED.to_string());
                } else {
                    redact(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

fn is_auth_header(name: &HeaderName) -> bool {
    *name == API_KEY_HEADER || *name == SECRET_KEY_HEADER
}

fn push_header(out: &mut String, name: &str, value: &str) {
    out.push_str(name);
    out.push_str(": ");
    out.push_str(value);
    out.push_str("\r\n");
}

fn push_existing(out: &mut String, headers: &HeaderMap, name: &HeaderName, display: &str) {
    if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
        push_header(out, display, value);
    }
}
