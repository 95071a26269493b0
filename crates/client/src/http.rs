//! Shared HTTP client for the StockMaster REST API.
//!
//! Every request passes through the same two steps:
//! - outgoing: attach `Authorization: Bearer <token>` when a token is stored;
//! - incoming: if the renewal header is present and a token is still stored,
//!   overwrite it (sliding session), whatever the status.
//!
//! Nothing here retries.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderName};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::storage::{SessionStore, TOKEN_KEY};

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    renewal_header: HeaderName,
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("renewal_header", &self.renewal_header)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("failed to build HTTP client: {e}")))?;

        let renewal_header = HeaderName::from_bytes(config.renewal_header.as_bytes())
            .map_err(|e| ClientError::Network(format!("invalid renewal header name: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            renewal_header,
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, self.url(path));
        match self.store.get(TOKEN_KEY) {
            Some(token) if !token.is_empty() => req.bearer_auth(token),
            _ => req,
        }
    }

    /// Send, apply the renewal step, and turn non-2xx into [`ClientError::Api`].
    async fn execute(&self, req: RequestBuilder) -> ClientResult<Response> {
        let resp = req.send().await?;

        if let Some(renewed) = resp
            .headers()
            .get(&self.renewal_header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            // Only renew a session that still exists (logout may have run
            // while the request was in flight).
            if self.store.get(TOKEN_KEY).is_some_and(|t| !t.is_empty()) {
                tracing::info!("backend renewed the session token (sliding session)");
                self.store.set(TOKEN_KEY, renewed);
            } else {
                tracing::debug!("ignoring renewed token; no session is stored");
            }
        }

        let status = resp.status();
        tracing::debug!(url = %resp.url(), status = status.as_u16(), "api response");

        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> ClientResult<T> {
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let resp = self.execute(self.request(Method::GET, path)).await?;
        Self::decode(resp).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let resp = self
            .execute(self.request(Method::GET, path).query(query))
            .await?;
        Self::decode(resp).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send_json(Method::POST, path, body).await?;
        Self::decode(resp).await
    }

    /// Like [`ApiClient::post`], but a 2xx body that is empty or not the
    /// expected JSON yields `T::default()` instead of an error.
    pub async fn post_lenient<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let resp = self.send_json(Method::POST, path, body).await?;
        let bytes = resp.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        Ok(serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            tracing::warn!(path, "unexpected success body; using defaults: {err}");
            T::default()
        }))
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send_json(Method::PUT, path, body).await?;
        Self::decode(resp).await
    }

    /// Send a JSON body and ignore whatever the backend answers with.
    pub async fn send_ignoring_body<B>(&self, method: Method, path: &str, body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.send_json(method, path, body).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute(self.request(Method::DELETE, path)).await.map(|_| ())
    }

    async fn send_json<B>(&self, method: Method, path: &str, body: &B) -> ClientResult<Response>
    where
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body).map_err(|e| ClientError::Decode(e.to_string()))?;
        let req = self
            .request(method, path)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        self.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn url_joins_without_double_slashes() {
        let config = ClientConfig::default().with_base_url("http://localhost:8080/api/");
        let api = ApiClient::new(&config, Arc::new(MemoryStore::new())).unwrap();
        assert_eq!(api.url("/products"), "http://localhost:8080/api/products");
        assert_eq!(api.url("reports/low-stock"), "http://localhost:8080/api/reports/low-stock");
    }

    #[test]
    fn invalid_renewal_header_is_rejected() {
        let mut config = ClientConfig::default();
        config.renewal_header = "bad header".to_string();
        assert!(ApiClient::new(&config, Arc::new(MemoryStore::new())).is_err());
    }
}
