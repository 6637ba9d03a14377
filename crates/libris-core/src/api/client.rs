//! HTTP client that attaches the session credential to every request.
//!
//! Two `ApiClient`s are built at startup, one rooted at the backend origin
//! for the `/auth/...` endpoints and one rooted at the `/api` prefix for
//! library resources. Both read the credential from the same [`Storage`]
//! on every request, so a login or logout is visible to the next call
//! without re-creating either client.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::auth::storage::{stored_token, SharedStorage, Storage};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Scheme prefix of the `Authorization` header.
pub const AUTH_SCHEME: &str = "Token";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Attach `Authorization: Token <credential>` when a credential is persisted.
///
/// The credential is read from storage at call time. A storage failure or a
/// credential that cannot be encoded as a header value is returned as-is.
pub fn authorize(request: RequestBuilder, storage: &dyn Storage) -> Result<RequestBuilder> {
    match stored_token(storage)? {
        Some(token) => {
            let mut value = header::HeaderValue::from_str(&format!("{} {}", AUTH_SCHEME, token))
                .context("Stored credential is not a valid header value")?;
            value.set_sensitive(true);
            Ok(request.header(header::AUTHORIZATION, value))
        }
        None => Ok(request),
    }
}

/// API client for the library backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    storage: SharedStorage,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`
    pub fn new(base_url: &str, storage: SharedStorage) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            storage,
        })
    }

    /// Create a client for another base address, sharing the connection pool
    /// and the credential storage.
    pub fn with_base_url(&self, base_url: &str) -> Self {
        Self {
            client: self.client.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            storage: self.storage.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Build a request for `path` with the credential header applied.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path);
        debug!(%method, %url, "Building request");
        authorize(self.client.request(method, &url), self.storage.as_ref())
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn execute(&self, request: RequestBuilder, method: &Method, path: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send {} request to {}", method, self.url(path)))?;
        debug!(%method, path, status = response.status().as_u16(), "Response received");
        Self::check_response(response).await
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<T> {
        let response = self.execute(request, &method, path).await?;
        let text = response
            .text()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to read response body from {}", path))?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.request(Method::GET, path)?;
        self.execute_json(request, Method::GET, path).await
    }

    pub async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let request = self.request(Method::GET, path)?.query(query);
        self.execute_json(request, Method::GET, path).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        let request = self.request(Method::POST, path)?.json(body);
        self.execute_json(request, Method::POST, path).await
    }

    /// POST whose response body is ignored (e.g. 204 No Content).
    pub async fn post_empty<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let request = self.request(Method::POST, path)?.json(body);
        self.execute(request, &Method::POST, path).await?;
        Ok(())
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        let request = self.request(Method::PATCH, path)?.json(body);
        self.execute_json(request, Method::PATCH, path).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let request = self.request(Method::DELETE, path)?;
        self.execute(request, &Method::DELETE, path).await?;
        Ok(())
    }
}
