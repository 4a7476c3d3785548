use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transport configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Server root (e.g. `https://octane.example.com`).
    pub server_url: String,
    /// Per-request read timeout in seconds.
    pub read_timeout_secs: u64,
    /// Path of the sign-in endpoint, relative to `server_url`.
    pub sign_in_path: String,
    /// Path of the sign-out endpoint, relative to `server_url`.
    pub sign_out_path: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            read_timeout_secs: 60,
            sign_in_path: "/authentication/sign_in".to_string(),
            sign_out_path: "/authentication/sign_out".to_string(),
        }
    }
}

impl TransportConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Default::default()
        }
    }

    /// Server root without a trailing slash.
    pub fn server_root(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    pub fn sign_in_url(&self) -> String {
        format!("{}{}", self.server_root(), self.sign_in_path)
    }

    pub fn sign_out_url(&self) -> String {
        format!("{}{}", self.server_root(), self.sign_out_path)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}
