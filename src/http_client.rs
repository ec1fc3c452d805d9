//! Fetching raw dataset documents from the web

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;

use crate::config::LoaderConfig;
use crate::error::{QuintError, Result};

/// Body of a fetched resource, with the content type it was served as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResource {
    pub body: String,
    pub content_type: Option<String>,
}

impl FetchedResource {
    pub fn new(body: impl Into<String>, content_type: Option<&str>) -> Self {
        Self { body: body.into(), content_type: content_type.map(str::to_owned) }
    }
}

/// Retrieves the raw text of a dataset
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch_text(&self, uri: &str, config: &LoaderConfig) -> Result<FetchedResource>;
}

/// HTTP fetcher backed by reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client, e.g. one carrying session cookies
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn build_request(&self, uri: &str, config: &LoaderConfig) -> RequestBuilder {
        let mut request = self.client.get(uri).header(ACCEPT, config.accept.as_str());
        // 0 disables the timeout
        if config.timeout_secs > 0 {
            request = request.timeout(Duration::from_secs(config.timeout_secs));
        }
        if let Some(token) = &config.auth_token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(agent) = &config.user_agent {
            request = request.header(USER_AGENT, agent.as_str());
        }
        request
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch_text(&self, uri: &str, config: &LoaderConfig) -> Result<FetchedResource> {
        let response = self.build_request(uri, config).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body =
                response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(uri, status, &error_body));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        Ok(FetchedResource { body, content_type })
    }
}

fn status_error(uri: &str, status: StatusCode, body: &str) -> QuintError {
    QuintError::Fetch { uri: uri.to_string(), message: format!("status {}: {}", status, body) }
}
