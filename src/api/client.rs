use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::session::SessionStore;

/// The single shared HTTP client.
///
/// Every request built through [`ApiClient::request`] carries
/// `Authorization: Token <token>` when the session holds one. There is no
/// response hook: callers decide what a 401 means for them, and nothing is retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    log_requests: bool,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| ClientError::Config(format!("invalid API base URL '{}': {}", base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            session,
            log_requests: config.log_requests,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        let joined = format!("{}{}", self.base_url, path);
        Url::parse(&joined).map_err(|e| ClientError::Config(format!("invalid request URL '{}': {}", joined, e)))
    }

    /// Build a request, attaching the session token if present
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.url(path)?;
        let mut request = self.http.request(method, url);
        if let Some(token) = self.session.token() {
            request = request.header(AUTHORIZATION, format!("Token {}", token));
        }
        Ok(request)
    }

    /// Send and require a 2xx status
    pub async fn execute(&self, method: Method, path: &str, request: RequestBuilder) -> Result<Response, ClientError> {
        if self.log_requests {
            tracing::debug!(%method, path, "api request");
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, path, "request failed: {}", e);
            ClientError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ClientError::from_response_body(status.as_u16(), &body);
        tracing::warn!(%method, path, status = status.as_u16(), "api error: {}", err);
        Err(err)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.request(Method::GET, path)?;
        let response = self.execute(Method::GET, path, request).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method.clone(), path)?.json(body);
        let response = self.execute(method, path, request).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send with an optional body and ignore whatever comes back
    pub async fn send_unit<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), ClientError>
    where
        B: serde::Serialize + ?Sized,
    {
        let mut request = self.request(method.clone(), path)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(method, path, request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::SessionUser;

    fn client(base: &str, session: SessionStore) -> ApiClient {
        ApiClient::new(&AppConfig::for_base_url(base).api, session).unwrap()
    }

    #[test]
    fn rejects_base_url_without_scheme() {
        let err = ApiClient::new(
            &AppConfig::for_base_url("44.204.152.96").api,
            SessionStore::in_memory(7),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn joins_paths_without_double_slash() {
        let api = client("http://localhost:8000/", SessionStore::in_memory(7));
        assert_eq!(
            api.url("/api/products/").unwrap().as_str(),
            "http://localhost:8000/api/products/"
        );
    }

    #[test]
    fn attaches_token_header_only_when_present() {
        let session = SessionStore::in_memory(7);
        let api = client("http://localhost:8000", session.clone());

        let anonymous = api.request(Method::GET, "/api/home/").unwrap().build().unwrap();
        assert!(anonymous.headers().get(AUTHORIZATION).is_none());

        session.save("abc123", SessionUser::new(1)).unwrap();
        let authed = api.request(Method::GET, "/api/products/").unwrap().build().unwrap();
        assert_eq!(authed.headers()[AUTHORIZATION], "Token abc123");
    }
}
