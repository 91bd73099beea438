//! Resource namespaces of the Swarm REST API.
//!
//! Each namespace borrows a client and is generic over [`Dispatch`], so the
//! async and blocking clients expose exactly the same methods. A method
//! validates its arguments, builds one [`ApiRequest`] and hands it to the
//! client; what comes back depends on the client (a future or a `Result`).
//!
//! [`Dispatch`]: crate::domain::ports::Dispatch
//! [`ApiRequest`]: crate::domain::model::ApiRequest

pub mod activity;
pub mod changes;
pub mod comments;
pub mod groups;
pub mod projects;
pub mod reviews;
pub mod servers;
pub mod workflows;

use crate::domain::model::ApiVersion;
use crate::utils::error::{Result, SwarmError};

pub(crate) const V1_1: ApiVersion = ApiVersion::new(1, 1);
pub(crate) const V2: ApiVersion = ApiVersion::new(2, 0);
pub(crate) const V4: ApiVersion = ApiVersion::new(4, 0);
pub(crate) const V5: ApiVersion = ApiVersion::new(5, 0);
pub(crate) const V6: ApiVersion = ApiVersion::new(6, 0);
pub(crate) const V7: ApiVersion = ApiVersion::new(7, 0);
pub(crate) const V9: ApiVersion = ApiVersion::new(9, 0);
pub(crate) const V11: ApiVersion = ApiVersion::new(11, 0);

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SwarmError::invalid(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// An identifier placed in the URL path must stay exactly one segment.
pub(crate) fn require_segment(field: &str, value: &str) -> Result<()> {
    require_non_empty(field, value)?;
    let decoded = value.to_ascii_lowercase().replace("%2e", ".");
    if value.contains(['/', '\\']) || decoded == "." || decoded == ".." {
        return Err(SwarmError::invalid(format!(
            "{} '{}' is not a valid path segment",
            field, value
        )));
    }
    Ok(())
}

/// Adds `version()` and the namespace accessors to a [`Dispatch`] client.
///
/// [`Dispatch`]: crate::domain::ports::Dispatch
macro_rules! impl_namespaces {
    ($client:ty) => {
        impl $client {
            /// Server and API version information (`GET version`).
            pub fn version(&self) -> <Self as $crate::domain::ports::Dispatch>::Response<'_> {
                $crate::domain::ports::Dispatch::dispatch(
                    self,
                    Ok($crate::domain::model::ApiRequest::get("version")),
                )
            }

            pub fn activity(&self) -> $crate::endpoints::activity::Activity<'_, Self> {
                $crate::endpoints::activity::Activity::new(self)
            }

            pub fn changes(&self) -> $crate::endpoints::changes::Changes<'_, Self> {
                $crate::endpoints::changes::Changes::new(self)
            }

            pub fn comments(&self) -> $crate::endpoints::comments::Comments<'_, Self> {
                $crate::endpoints::comments::Comments::new(self)
            }

            pub fn groups(&self) -> $crate::endpoints::groups::Groups<'_, Self> {
                $crate::endpoints::groups::Groups::new(self)
            }

            pub fn projects(&self) -> $crate::endpoints::projects::Projects<'_, Self> {
                $crate::endpoints::projects::Projects::new(self)
            }

            pub fn reviews(&self) -> $crate::endpoints::reviews::Reviews<'_, Self> {
                $crate::endpoints::reviews::Reviews::new(self)
            }

            pub fn servers(&self) -> $crate::endpoints::servers::Servers<'_, Self> {
                $crate::endpoints::servers::Servers::new(self)
            }

            pub fn workflows(&self) -> $crate::endpoints::workflows::Workflows<'_, Self> {
                $crate::endpoints::workflows::Workflows::new(self)
            }
        }
    };
}

pub(crate) use impl_namespaces;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_segment() {
        assert!(require_segment("project id", "jam").is_ok());
        assert!(require_segment("group id", "team a#1").is_ok());
        assert!(require_segment("project id", "v1.2").is_ok());

        for bad in ["", " ", "team/qa", "jam/..", "..", ".", "%2E%2e", "a\\b"] {
            assert!(
                matches!(
                    require_segment("project id", bad),
                    Err(SwarmError::InvalidArgument { .. })
                ),
                "accepted {:?}",
                bad
            );
        }
    }
}

/// Test double that records what a namespace would send.
#[cfg(test)]
pub(crate) mod recorder {
    use crate::domain::model::{ApiRequest, ApiVersion};
    use crate::domain::ports::Dispatch;
    use crate::utils::error::Result;

    pub struct Recorder {
        pub version: ApiVersion,
    }

    impl Recorder {
        pub fn v(major: u32) -> Self {
            Self {
                version: ApiVersion::new(major, 0),
            }
        }
    }

    impl Dispatch for Recorder {
        type Response<'a> = Result<ApiRequest>
        where
            Self: 'a;

        fn api_version(&self) -> ApiVersion {
            self.version
        }

        fn dispatch(&self, request: Result<ApiRequest>) -> Self::Response<'_> {
            request
        }
    }
}
