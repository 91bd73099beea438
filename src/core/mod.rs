#[cfg(feature = "blocking")]
pub mod blocking;
pub mod client;
pub mod request;

pub use crate::domain::model::{ApiRequest, ApiVersion, Body};
pub use crate::domain::ports::Dispatch;
pub use crate::utils::error::Result;
