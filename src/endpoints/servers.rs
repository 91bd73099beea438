use crate::domain::model::ApiRequest;
use crate::domain::ports::Dispatch;
use crate::endpoints::V4;

/// Perforce servers of a multi-server Swarm install.
pub struct Servers<'a, C> {
    client: &'a C,
}

impl<'a, C: Dispatch> Servers<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub fn list(&self) -> C::Response<'a> {
        let request = self
            .client
            .require("servers.list", V4)
            .map(|_| ApiRequest::get("servers"));
        self.client.dispatch(request)
    }
}
