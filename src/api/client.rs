//! Credentialed HTTP client bound to the backend origin

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;

use crate::{config::ApiConfig, endpoints, error::AppResult};

/// HTTP client for the backend.
///
/// Keeps a cookie jar so every request carries the session cookie set at
/// login, the way a browser sends credentials with `credentials: 'include'`.
/// Clones share the jar.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url)?;

        let mut builder = Client::builder()
            .cookie_store(true)
            .user_agent(concat!("lms-portal/", env!("CARGO_PKG_VERSION")));
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        Ok(Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            http: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        endpoints::api_url(&self.base_url, endpoint)
    }

    pub async fn get(&self, endpoint: &str) -> reqwest::Result<Response> {
        let url = self.url(endpoint);
        tracing::debug!("GET {}", url);
        self.http.get(url).send().await
    }

    pub async fn post(&self, endpoint: &str) -> reqwest::Result<Response> {
        let url = self.url(endpoint);
        tracing::debug!("POST {}", url);
        self.http.post(url).send().await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> reqwest::Result<Response> {
        let url = self.url(endpoint);
        tracing::debug!("POST {}", url);
        self.http.post(url).json(body).send().await
    }

    pub async fn delete(&self, endpoint: &str) -> reqwest::Result<Response> {
        let url = self.url(endpoint);
        tracing::debug!("DELETE {}", url);
        self.http.delete(url).send().await
    }
}
