//! Client for the Perforce Helix Swarm REST API.
//!
//! [`SwarmClient`] (async) and [`BlockingSwarmClient`] (feature `blocking`)
//! expose the same resource namespaces: `reviews()`, `comments()`,
//! `projects()`, `groups()`, `activity()`, `changes()`, `servers()` and
//! `workflows()`. Responses are returned as untouched [`serde_json::Value`]s.

pub mod config;
pub mod core;
pub mod domain;
pub mod endpoints;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;
pub use crate::config::{toml_config::TomlConfig, ClientConfig};

#[cfg(feature = "blocking")]
pub use crate::core::blocking::BlockingSwarmClient;
pub use crate::core::client::SwarmClient;
pub use crate::domain::model::{ApiRequest, ApiVersion, Body};
pub use crate::domain::ports::Dispatch;
pub use crate::utils::error::{Result, SwarmError};
