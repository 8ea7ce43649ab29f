//! Authenticated HTTP client for the Sunflower API
//!
//! Wraps reqwest::Client with bearer injection, business-envelope
//! unwrapping, and the 401 recovery protocol: refresh the token pair once
//! (deduplicated across concurrent callers) and replay the original request
//! once. A 401 from the refresh endpoint itself, a second 401, or a missing
//! refresh token all end the session: tokens are cleared and the caller gets
//! the session-expired message.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::{SingleFlight, TokenStore};
use crate::config::ApiConfig;
use crate::models::{RefreshTokenRequest, RefreshTokenResponse};

use super::endpoints;
use super::error::ApiError;

/// Business envelope around every response body. `code` absent or 0 means
/// success; `data` carries the payload.
#[derive(Debug, Deserialize)]
struct Envelope {
    code: Option<i64>,
    message: Option<String>,
    data: Option<serde_json::Value>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
    /// At most one token refresh in flight; concurrent 401 handlers join it.
    refresh_flight: SingleFlight<Result<String, ApiError>>,
}

/// Cheap to clone; all clones share the connection pool, token store and
/// refresh slot.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<ClientInner>,
}

impl HttpClient {
    pub fn new(config: &ApiConfig, tokens: TokenStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ApiError::unknown(&config.base_url, &err.to_string()))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                tokens,
                refresh_flight: SingleFlight::new(),
            }),
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let body = serde_json::to_value(body)
            .map_err(|err| ApiError::unknown(path, &err.to_string()))?;
        self.execute(Method::POST, path, Some(body)).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let inner = &self.inner;
        let url = format!("{}{}", inner.base_url, path);
        let mut retried = false;

        loop {
            let mut request = inner.http.request(method.clone(), &url);
            if let Some(token) = inner.tokens.access_token() {
                request = request.bearer_auth(token);
            }
            if let Some(body) = &body {
                request = request.json(body);
            }
            tracing::debug!("{} {}", method, url);

            let response = request
                .send()
                .await
                .map_err(|err| ApiError::network(&url, &err))?;
            let status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                // The refresh endpoint rejecting its own credential is final.
                if path == endpoints::AUTH_REFRESH {
                    inner.tokens.clear_tokens();
                    return Err(ApiError::auth(&url, "refresh endpoint rejected the token"));
                }
                if !retried && inner.tokens.refresh_token().is_some() {
                    retried = true;
                    match self.refresh_access_token().await {
                        // replay once with the new bearer token
                        Ok(_) => continue,
                        Err(err) => {
                            tracing::warn!("token refresh failed: {}", err);
                            inner.tokens.clear_tokens();
                            return Err(ApiError::auth(&url, "token refresh failed"));
                        }
                    }
                }
                inner.tokens.clear_tokens();
                return Err(ApiError::auth(&url, "unauthorized, session ended"));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::from_status(&url, status, envelope_message(&body)));
            }

            let data = unwrap_envelope(response, &url).await?;
            return serde_json::from_value(data).map_err(|err| {
                ApiError::unknown(&url, &format!("failed to decode response data: {}", err))
            });
        }
    }

    /// Obtain a fresh access token, deduplicating concurrent attempts: only
    /// one refresh call goes out, and everyone waiting gets its outcome.
    async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let inner = self.inner.clone();
        self.inner.refresh_flight.run(|| refresh_once(inner)).await
    }
}

/// The one actual refresh call. Persists the rotated pair into whichever
/// tier the current session uses, so a "remember me" login stays durable.
async fn refresh_once(inner: Arc<ClientInner>) -> Result<String, ApiError> {
    let url = format!("{}{}", inner.base_url, endpoints::AUTH_REFRESH);
    let refresh_token = inner
        .tokens
        .refresh_token()
        .ok_or_else(|| ApiError::auth(&url, "no refresh token available"))?;

    tracing::debug!("POST {} (token refresh)", url);
    let response = inner
        .http
        .post(&url)
        .json(&RefreshTokenRequest { refresh_token })
        .send()
        .await
        .map_err(|err| ApiError::network(&url, &err))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_status(&url, status, envelope_message(&body)));
    }

    let data = unwrap_envelope(response, &url).await?;
    let pair: RefreshTokenResponse = serde_json::from_value(data).map_err(|err| {
        ApiError::unknown(&url, &format!("failed to decode refresh response: {}", err))
    })?;

    let remember = inner.tokens.is_remember_login();
    inner
        .tokens
        .set_tokens(&pair.access_token, &pair.refresh_token, remember)
        .map_err(|err| ApiError::unknown(&url, &format!("{:#}", err)))?;

    tracing::info!("access token refreshed");
    Ok(pair.access_token)
}

/// Unwrap a 2xx body: raise on a non-zero envelope code, otherwise hand back
/// `data`, defaulting to an empty object when absent.
async fn unwrap_envelope(
    response: reqwest::Response,
    url: &str,
) -> Result<serde_json::Value, ApiError> {
    let envelope: Envelope = response.json().await.map_err(|err| {
        ApiError::unknown(url, &format!("failed to parse response envelope: {}", err))
    })?;

    if let Some(code) = envelope.code {
        if code != 0 {
            return Err(ApiError::business(url, code, envelope.message));
        }
    }

    Ok(envelope
        .data
        .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new())))
}

/// Best-effort extraction of the server message from an error body.
fn envelope_message(body: &str) -> Option<String> {
    serde_json::from_str::<Envelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
}
