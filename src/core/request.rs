// Pieces of the request layer shared by the async and blocking clients.

use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::config::ClientConfig;
use crate::domain::model::{ApiRequest, ApiVersion};
use crate::utils::error::{Result, SwarmError};
use crate::utils::validation::Validate;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("helix-swarm/", env!("CARGO_PKG_VERSION"));

/// Basic auth credentials. The password may also be a P4 ticket.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Everything a client needs, resolved once at construction.
#[derive(Debug, Clone)]
pub(crate) struct ClientSettings {
    pub base_url: Url,
    pub api_version: ApiVersion,
    pub credentials: Credentials,
    pub timeout: Duration,
    pub verify_tls: bool,
    pub user_agent: String,
}

impl ClientSettings {
    pub fn new(url: &str, credentials: Credentials) -> Result<Self> {
        let (base_url, api_version) = parse_base_url(url)?;
        Ok(Self {
            base_url,
            api_version,
            credentials,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verify_tls: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let mut settings = Self::new(
            &config.url,
            Credentials::new(config.user.clone(), config.password.clone()),
        )?;
        settings.timeout = Duration::from_secs(config.timeout_secs());
        settings.verify_tls = config.verify_tls();
        if let Some(agent) = &config.user_agent {
            settings.user_agent = agent.clone();
        }
        Ok(settings)
    }
}

/// Splits `http://server/api/v9` into the normalised base URL and its version.
pub fn parse_base_url(raw: &str) -> Result<(Url, ApiVersion)> {
    let invalid = |reason: String| SwarmError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(invalid(format!("unsupported scheme '{}'", scheme))),
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query strings and fragments are not allowed".to_string()));
    }

    let trimmed = url.path().trim_end_matches('/').to_string();
    url.set_path(&trimmed);

    let segment = trimmed.rsplit('/').next().unwrap_or_default();
    if !segment.starts_with('v') {
        return Err(invalid(
            "URL must end with the API version segment, e.g. /api/v9".to_string(),
        ));
    }
    let version = segment
        .parse::<ApiVersion>()
        .map_err(|e| invalid(e.to_string()))?;

    Ok((url, version))
}

/// Base URL plus the request's path segments and query pairs.
pub fn endpoint_url(base: &Url, request: &ApiRequest) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|_| SwarmError::InvalidUrl {
            url: base.to_string(),
            reason: "URL cannot be a base".to_string(),
        })?;
        segments
            .pop_if_empty()
            .extend(request.path.split('/').filter(|s| !s.is_empty()));
    }

    if !request.query.is_empty() {
        url.query_pairs_mut().extend_pairs(request.query.pairs());
    }

    Ok(url)
}

/// 2xx bodies are decoded as JSON, anything else becomes a request error.
pub fn classify(status: StatusCode, body: String) -> Result<Value> {
    if !status.is_success() {
        tracing::debug!("❌ Swarm responded {}: {}", status, body);
        return Err(SwarmError::Request {
            status: status.as_u16(),
            body,
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&body)?)
}
