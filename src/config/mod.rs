#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::request::DEFAULT_TIMEOUT_SECS;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

/// Connection settings for a Swarm client.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL including the API version, e.g. `https://swarm/api/v9`.
    pub url: String,
    pub user: String,
    /// Password or P4 ticket.
    pub password: String,
    pub timeout_secs: Option<u64>,
    pub verify_tls: Option<bool>,
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: user.into(),
            password: password.into(),
            timeout_secs: None,
            verify_tls: None,
            user_agent: None,
        }
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls.unwrap_or(true)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .field("verify_tls", &self.verify_tls)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("url", &self.url)?;
        validation::validate_api_version_url("url", &self.url)?;
        validation::validate_non_empty_string("user", &self.user)?;
        if let Some(timeout) = self.timeout_secs {
            validation::validate_range("timeout_secs", timeout, 1, 3600)?;
        }
        Ok(())
    }
}
