//! Credential context
//!
//! Credentials are an explicit value passed into every client constructor.
//! There is no process-wide default: callers that want a shared credential
//! set keep one `Credentials` value and clone it where needed.

use serde::{Deserialize, Serialize};

/// API credentials for the hosted platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub api_key: String,
    /// Base URL of the user's API endpoint. Derived from the username when
    /// not given explicitly.
    base_url: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            api_key: api_key.into(),
            base_url: None,
        }
    }

    /// Override the derived base URL (on-premise installations).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// The API endpoint for this user.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.carto.com", self.username),
        }
    }

    /// The warehouse dataset that holds this user's private views and
    /// temporary upload tables.
    pub fn user_dataset(&self) -> String {
        self.username.replace('-', "_")
    }
}
