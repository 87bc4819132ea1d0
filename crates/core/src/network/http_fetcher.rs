use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::http::{Method, Request, Response};
use super::traits::Fetcher;

/// `Fetcher` backed by a shared `reqwest` client.
///
/// Origin-relative URLs ("/api/trades") are resolved against `base_url`;
/// without a base URL they are rejected as `InvalidUrl`.
pub struct HttpFetcher {
    client: Client,
    base_url: Option<String>,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: None,
        }
    }

    /// Resolve relative request URLs against `base_url` (e.g., "http://localhost:3000").
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into().trim_end_matches('/').to_string()),
            ..Self::new()
        }
    }

    fn absolute_url(&self, url: &str) -> Result<String, CoreError> {
        if url.contains("://") {
            return Ok(url.to_string());
        }
        match &self.base_url {
            Some(base) if url.starts_with('/') => Ok(format!("{base}{url}")),
            Some(base) => Ok(format!("{base}/{url}")),
            None => Err(CoreError::InvalidUrl(format!(
                "relative URL {url:?} with no base URL configured"
            ))),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn to_reqwest_method(method: &Method) -> Result<reqwest::Method, CoreError> {
    reqwest::Method::from_bytes(method.as_str().as_bytes())
        .map_err(|e| CoreError::InvalidUrl(format!("invalid method {method}: {e}")))
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn fetch(&self, request: &Request) -> Result<Response, CoreError> {
        let url = self.absolute_url(&request.url)?;
        let mut builder = self
            .client
            .request(to_reqwest_method(&request.method)?, &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let resp = builder.send().await?;

        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_ascii_lowercase(), value.to_string()))
            })
            .collect();
        let body = resp.bytes().await?.to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
