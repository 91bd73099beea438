use crate::domain::model::{ApiRequest, ApiVersion};
use crate::utils::error::{Result, SwarmError};

/// Transport seam shared by the async and blocking clients.
///
/// Resource namespaces are written once against this trait. The client decides
/// what a call returns: a boxed future for [`crate::SwarmClient`], a plain
/// `Result` for the blocking client.
pub trait Dispatch {
    type Response<'a>
    where
        Self: 'a;

    fn api_version(&self) -> ApiVersion;

    /// Sends `request`, or hands a local validation error straight back.
    fn dispatch(&self, request: Result<ApiRequest>) -> Self::Response<'_>;

    /// Fails with [`SwarmError::Unsupported`] below `required`.
    fn require(&self, feature: &str, required: ApiVersion) -> Result<()> {
        let actual = self.api_version();
        if actual < required {
            return Err(SwarmError::Unsupported {
                feature: feature.to_string(),
                required,
                actual,
            });
        }
        Ok(())
    }
}
