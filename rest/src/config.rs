//! Connection settings for the REST backend.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestConfig {
    /// Service root, e.g. `https://project.supabase.co`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Public (anon) API key sent as `apikey` and bearer token.
    #[serde(default)]
    pub api_key: String,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl RestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}
