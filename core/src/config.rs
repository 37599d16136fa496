//! Client configuration.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration. Timeouts are off unless set; the engine itself never
//! times a request out.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::request::DEFAULT_USER_AGENT;

/// Default cap on the number of redirects followed for one request.
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// `User-Agent` seeded into requests created through the client.
    pub user_agent: String,
    /// Redirects followed before giving up. `None` follows without limit.
    pub max_redirects: Option<u32>,
    pub connect_timeout_ms: Option<u64>,
    /// Overall deadline for a single attempt.
    pub timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: Some(DEFAULT_MAX_REDIRECTS),
            connect_timeout_ms: None,
            timeout_ms: None,
        }
    }
}

impl ClientConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
