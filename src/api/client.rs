//! JSON REST client for the portfolio backend.
//!
//! Uses reqwest with optional Bearer token auth. Every request and response
//! is logged; 401 and 5xx responses map to dedicated error variants.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::DashboardError;
use crate::types::Config;

pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    timeout_secs: u64,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, DashboardError> {
        let base_url = parse_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| DashboardError::ConfigurationError(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url,
            token: None,
            timeout_secs,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, DashboardError> {
        Self::new(&config.resolved_api_base_url(), config.api_timeout_secs)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` (with optional query string) against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, DashboardError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| DashboardError::ConfigurationError(format!("Bad API path '{}': {}", path, e)))
    }

    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, DashboardError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        log::info!("API request: {} {}", method, url);

        let mut req = self
            .client
            .request(method.clone(), url.clone())
            .header("Content-Type", "application/json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| {
            log::error!("API request error: {} {}: {}", method, url, e);
            if e.is_timeout() {
                DashboardError::Timeout(self.timeout_secs)
            } else {
                DashboardError::NetworkError(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            log::error!("API response error: {} {}", status.as_u16(), url);
            return Err(classify_status(status, text));
        }
        log::info!("API response: {} {}", status.as_u16(), url);

        resp.json::<T>()
            .await
            .map_err(|e| DashboardError::ParseError(format!("API response from {}: {}", url, e)))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashboardError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, DashboardError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, DashboardError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, DashboardError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashboardError> {
        self.request::<T, ()>(Method::DELETE, path, None).await
    }
}

/// Base URLs always end in `/` so relative joins keep any path prefix.
fn parse_base_url(raw: &str) -> Result<Url, DashboardError> {
    let mut text = raw.trim().to_string();
    if !text.ends_with('/') {
        text.push('/');
    }
    Url::parse(&text)
        .map_err(|e| DashboardError::ConfigurationError(format!("Invalid API URL '{}': {}", raw, e)))
}

/// Map a non-success status to an error.
pub fn classify_status(status: StatusCode, body: String) -> DashboardError {
    if status == StatusCode::UNAUTHORIZED {
        log::warn!("Unauthorized response; session needs a fresh login");
        return DashboardError::Unauthorized;
    }
    if status.is_server_error() {
        return DashboardError::ServerError(status.as_u16());
    }
    DashboardError::HttpStatus {
        status: status.as_u16(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = ApiClient::new("https://api.example.com/v1", 10).unwrap();
        assert_eq!(
            client.endpoint("/user/me").unwrap().as_str(),
            "https://api.example.com/v1/user/me"
        );
        assert_eq!(
            client.endpoint("users?page=2&limit=10").unwrap().as_str(),
            "https://api.example.com/v1/users?page=2&limit=10"
        );
    }

    #[test]
    fn test_with_token_sets_bearer() {
        let client = ApiClient::new("https://api.example.com", 10).unwrap();
        assert!(client.token.is_none());
        let client = client.with_token("abc123");
        assert_eq!(client.token.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url", 10),
            Err(DashboardError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_from_config_default_base() {
        let client = ApiClient::from_config(&Config {
            api_base_url: "https://portfolio.internal".into(),
            ..Config::default()
        })
        .unwrap();
        // PORTVIEW_API_URL may be set in the environment
        if std::env::var(crate::types::API_URL_ENV).is_err() {
            assert_eq!(client.base_url().as_str(), "https://portfolio.internal/");
        }
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, String::new()),
            DashboardError::Unauthorized
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, String::new()),
            DashboardError::ServerError(502)
        ));
        match classify_status(StatusCode::NOT_FOUND, "missing".into()) {
            DashboardError::HttpStatus { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "missing");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = ApiClient::new("http://127.0.0.1:9", 2).unwrap();
        let err = client.get::<serde_json::Value>("/user/me").await.unwrap_err();
        assert!(err.is_retryable(), "got {:?}", err);
    }
}
