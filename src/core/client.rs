use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::core::request::{classify, endpoint_url, ClientSettings, Credentials};
use crate::domain::model::{ApiRequest, ApiVersion, Body};
use crate::domain::ports::Dispatch;
use crate::utils::error::{Result, SwarmError};

/// Non-blocking Swarm client. Every call returns a future that performs a
/// single HTTP exchange.
///
/// ```no_run
/// # async fn demo() -> helix_swarm::Result<()> {
/// let swarm = helix_swarm::SwarmClient::new("http://server/api/v9", "alice", "ticket")?;
/// let review = swarm.reviews().get(12345, &[]).await?;
/// println!("{}", review["review"]["state"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SwarmClient {
    http: Client,
    settings: ClientSettings,
}

impl SwarmClient {
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
            "Created Swarm client for {} (API v{})",
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
    pub fn prepare(&self, request: &ApiRequest) -> Result<reqwest::Request> {
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

    pub async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let http_request = self.prepare(&request)?;
        tracing::debug!("📡 {} {}", http_request.method(), http_request.url());

        let response = self.http.execute(http_request).await?;
        let status = response.status();
        tracing::debug!("📡 Swarm response status: {}", status);

        let body = response.text().await?;
        classify(status, body)
    }

    /// Releases the connection pool. Dropping the client has the same effect.
    pub fn close(self) {
        tracing::debug!("Closing Swarm client for {}", self.settings.base_url);
    }
}

impl Dispatch for SwarmClient {
    type Response<'a> = BoxFuture<'a, Result<Value>>
    where
        Self: 'a;

    fn api_version(&self) -> ApiVersion {
        self.settings.api_version
    }

    fn dispatch(&self, request: Result<ApiRequest>) -> Self::Response<'_> {
        Box::pin(async move { self.execute(request?).await })
    }
}

crate::endpoints::impl_namespaces!(SwarmClient);
