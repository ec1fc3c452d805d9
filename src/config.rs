//! Configuration for loading datasets from the web

use serde::{Deserialize, Serialize};

use crate::RdfFormat;

/// Default `Accept` header, preferring Turtle
pub const DEFAULT_ACCEPT: &str = "text/turtle, application/n-triples;q=0.9, \
     application/n-quads;q=0.9, application/trig;q=0.9, application/rdf+xml;q=0.8";

/// Session and transport settings used when fetching a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Bearer token sent with every request
    pub auth_token: Option<String>,
    /// Upper bound for fetching and parsing one dataset
    pub timeout_secs: u64,
    pub accept: String,
    /// Syntax assumed when the response carries no usable content type
    pub default_format: RdfFormat,
    pub user_agent: Option<String>,
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self {
            auth_token: None,
            timeout_secs: 30,
            accept: DEFAULT_ACCEPT.to_string(),
            default_format: RdfFormat::Turtle,
            user_agent: None,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    pub fn with_default_format(mut self, format: RdfFormat) -> Self {
        self.default_format = format;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new()
    }
}
