use reqwest::blocking::Client;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::core::request::{classify, endpoint_url, ClientSettings, Credentials};
use crate::domain::model::{ApiRequest, ApiVersion, Body};
use crate::domain::ports::Dispatch;
use crate::utils::error::{Result, SwarmError};

/// Blocking counterpart of [`crate::SwarmClient`] with the same namespaces and
/// methods. Calls hold the current thread until the response arrives.
///
/// Do not create or drop it from inside an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingSwarmClient {
    http: Client,
    settings: ClientSettings,
}

impl BlockingSwarmClient {
    pub fn new(url: &str, user: &str, password: &str) -> Result<Self> {
        Self::with_settings(ClientSettings::new(url, Credentials::new(user, password))?)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::with_settings(ClientSettings::from_config(config)?)
    }

    fn with_settings(settings: ClientSettings) -> Result<Self> {
        let http = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(!settings.verify_tls)
            .build()
            .map_err(|e| SwarmError::Config {
                field: "transport".to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            "Created blocking Swarm client for {} (API v{})",
            settings.base_url,
            settings.api_version
        );
        Ok(Self { http, settings })
    }

    pub fn base_url(&self) -> &Url {
        &self.settings.base_url
    }

    pub fn user(&self) -> &str {
        &self.settings.credentials.user
    }

    /// Builds the HTTP request for `request` without sending it.
    pub fn prepare(&self, request: &ApiRequest) -> Result<reqwest::blocking::Request> {
        let url = endpoint_url(&self.settings.base_url, request)?;
        let credentials = &self.settings.credentials;

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .basic_auth(&credentials.user, Some(&credentials.password));

        builder = match &request.body {
            Some(Body::Form(pairs)) => builder.form(pairs),
            Some(Body::Json(value)) => builder.json(value),
            None => builder,
        };

        builder
            .build()
            .map_err(|e| SwarmError::invalid(format!("could not build request: {}", e)))
    }

    pub fn execute(&self, request: ApiRequest) -> Result<Value> {
        let http_request = self.prepare(&request)?;
        tracing::debug!("📡 {} {}", http_request.method(), http_request.url());

        let response = self.http.execute(http_request)?;
        let status = response.status();
        tracing::debug!("📡 Swarm response status: {}", status);

        let body = response.text()?;
        classify(status, body)
    }

    /// Releases the connection pool. Dropping the client has the same effect.
    pub fn close(self) {
        tracing::debug!("Closing blocking Swarm client for {}", self.settings.base_url);
    }
}

impl Dispatch for BlockingSwarmClient {
    type Response<'a> = Result<Value>
    where
        Self: 'a;

    fn api_version(&self) -> ApiVersion {
        self.settings.api_version
    }

    fn dispatch(&self, request: Result<ApiRequest>) -> Self::Response<'_> {
        self.execute(request?)
    }
}

crate::endpoints::impl_namespaces!(BlockingSwarmClient);
