//! HTTP client construction and response classification.
//!
//! Every adapter invocation builds its own client with the timeout and
//! certificate policy its provider needs. Responses are funnelled through
//! [`check_status`] so that 401/403, other non-2xx statuses, transport failures
//! and undecodable payloads land in the right [`StatsError`] category.

use std::error::Error as _;
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::core::redact::is_sensitive_key;
use crate::error::{Result, StatsError};

/// Sent on every outbound request
pub const USER_AGENT: &str = "Homepage-Dashboard/1.0";

const ERROR_BODY_LIMIT: usize = 200;

/// Blocking HTTP client scoped to a single adapter invocation
pub struct HttpClient {
    inner: Client,
}

/// Build a client with a fixed per-call timeout. `allow_insecure_tls` disables
/// certificate validation for providers that usually run with self-signed certs.
pub fn new_client(timeout: Duration, allow_insecure_tls: bool) -> Result<HttpClient> {
    let inner = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .danger_accept_invalid_certs(allow_insecure_tls)
        .build()
        .map_err(|e| StatsError::connection(format!("failed to build HTTP client: {}", e)))?;

    Ok(HttpClient { inner })
}

impl HttpClient {
    pub fn get(&self, url: &str) -> RequestBuilder {
        debug!("GET {}", masked_url(url));
        self.inner.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        debug!("POST {}", masked_url(url));
        self.inner.post(url)
    }

    /// Send without looking at the status code
    pub fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().map_err(map_transport_error)
    }

    /// Send and reject anything that is not 2xx
    pub fn send_checked(&self, request: RequestBuilder) -> Result<Response> {
        check_status(self.send(request)?)
    }

    /// Send, check the status, decode the JSON body
    pub fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        decode_json(self.send_checked(request)?)
    }
}

/// URL safe for logging: sensitive query parameters are replaced with `***`
pub fn masked_url(raw: &str) -> String {
    let Ok(mut parsed) = url::Url::parse(raw) else {
        return raw.to_string();
    };
    if parsed.query().is_none() {
        return raw.to_string();
    }

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            let value = if is_sensitive_key(&k) {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();
    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.to_string()
}

/// Classify a response by status: 401/403 become `Auth`, other failures `Protocol`
pub fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let snippet: String = body.trim().chars().take(ERROR_BODY_LIMIT).collect();
    let message = if snippet.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("HTTP {}: {}", status.as_u16(), snippet)
    };

    if is_auth_status(status) {
        Err(StatsError::auth(message))
    } else {
        Err(StatsError::protocol(message))
    }
}

pub fn is_auth_status(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

pub fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response.json::<T>().map_err(map_transport_error)
}

/// Map a reqwest failure onto the error taxonomy
pub fn map_transport_error(err: reqwest::Error) -> StatsError {
    let message = error_chain(&err);
    if err.is_builder() {
        StatsError::validation(format!("invalid request: {}", message))
    } else if err.is_decode() {
        StatsError::protocol(format!("failed to parse response: {}", message))
    } else {
        StatsError::connection(message)
    }
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Degrade a failed secondary sub-request to `None`, logging the cause
pub fn best_effort<T>(what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} failed, leaving fields at defaults: {}", what, e);
            None
        }
    }
}
