//! services/storefront/src/adapters/http.rs
//!
//! The shared REST client used by every HTTP adapter. It owns the `reqwest` client,
//! attaches the bearer token from the session store to each request, and unwraps the
//! backend's `{success, data, message}` envelope into a `PortResult`.

use super::wire::{decode_data, Envelope};
use reqwest::{Method, RequestBuilder, StatusCode};
use robokit_core::ports::{PortError, PortResult, SessionStore};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Creates a client whose requests all share the given timeout.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Starts a request against `path`, carrying the current bearer token if one is stored.
    ///
    /// The token is read on every call so that a logout takes effect immediately.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and decodes the envelope's `data` member into `T`.
    pub async fn send<T: DeserializeOwned>(&self, path: &str, builder: RequestBuilder) -> PortResult<T> {
        let envelope = self.exchange(path, builder).await?;
        decode_data(envelope.data)
    }

    /// Sends the request and only checks that the backend reported success.
    pub async fn send_unit(&self, path: &str, builder: RequestBuilder) -> PortResult<()> {
        self.exchange(path, builder).await.map(|_| ())
    }

    /// Probes the backend's `/health` endpoint.
    pub async fn health(&self) -> PortResult<String> {
        let path = "/health";
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(PortError::Backend(format!("health check answered HTTP {}", status)));
        }
        let message = serde_json::from_slice::<Envelope>(&body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| "ok".to_string());
        Ok(message)
    }

    async fn exchange(&self, path: &str, builder: RequestBuilder) -> PortResult<Envelope> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;
        tracing::debug!(path, %status, bytes = body.len(), "backend responded");

        if status == StatusCode::UNAUTHORIZED {
            return Err(PortError::Unauthorized);
        }

        let envelope = match serde_json::from_slice::<Envelope>(&body) {
            Ok(envelope) => envelope,
            Err(_) if status == StatusCode::NOT_FOUND => {
                return Err(PortError::NotFound(path.to_string()))
            }
            Err(_) if !status.is_success() => {
                return Err(PortError::Backend(format!("HTTP {} from {}", status, path)))
            }
            Err(e) => return Err(PortError::InvalidResponse(e.to_string())),
        };

        if status == StatusCode::NOT_FOUND {
            return Err(PortError::NotFound(
                envelope.message.unwrap_or_else(|| path.to_string()),
            ));
        }
        // A blank message is passed through; callers pick their own fallback text.
        if !envelope.success {
            return Err(PortError::Backend(envelope.message.unwrap_or_default()));
        }
        if !status.is_success() {
            return Err(PortError::Backend(format!("HTTP {} from {}", status, path)));
        }
        Ok(envelope)
    }
}

fn transport_error(err: reqwest::Error) -> PortError {
    if err.is_decode() {
        PortError::InvalidResponse(err.to_string())
    } else {
        PortError::Network(err.to_string())
    }
}
