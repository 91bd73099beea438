use serde_json::Value;

use crate::domain::model::{ApiRequest, Body};
use crate::domain::params::Query;
use crate::domain::ports::Dispatch;
use crate::endpoints::{require_non_empty, require_segment, V9};
use crate::utils::error::{Result, SwarmError};

/// Review workflows (API v9+). Bodies are JSON documents passed through as
/// given, so every workflow setting Swarm knows about can be sent.
pub struct Workflows<'a, C> {
    client: &'a C,
}

impl<'a, C: Dispatch> Workflows<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub fn list(&self, fields: &[&str], no_cache: bool) -> C::Response<'a> {
        let request = self.client.require("workflows.list", V9).map(|_| {
            let mut query = Query::new();
            query.push_fields(fields);
            if no_cache {
                query.push("noCache", "true");
            }
            ApiRequest::get("workflows").with_query(query)
        });
        self.client.dispatch(request)
    }

    pub fn get(&self, workflow_id: &str, fields: &[&str]) -> C::Response<'a> {
        let request = self
            .client
            .require("workflows.get", V9)
            .and_then(|_| require_segment("workflow id", workflow_id))
            .map(|_| {
                let mut query = Query::new();
                query.push_fields(fields);
                ApiRequest::get(format!("workflows/{}", workflow_id)).with_query(query)
            });
        self.client.dispatch(request)
    }

    pub fn create(&self, workflow: &Value) -> C::Response<'a> {
        let request = self
            .client
            .require("workflows.create", V9)
            .and_then(|_| named_document(workflow))
            .map(|body| ApiRequest::post("workflows").with_body(body));
        self.client.dispatch(request)
    }

    /// Partial update; only the keys present in `changes` are modified.
    pub fn update(&self, workflow_id: &str, changes: &Value) -> C::Response<'a> {
        let request = self
            .client
            .require("workflows.update", V9)
            .and_then(|_| require_segment("workflow id", workflow_id))
            .and_then(|_| document(changes))
            .map(|body| ApiRequest::patch(format!("workflows/{}", workflow_id)).with_body(body));
        self.client.dispatch(request)
    }

    /// Full replacement of a workflow definition.
    pub fn replace(&self, workflow_id: &str, workflow: &Value) -> C::Response<'a> {
        let request = self
            .client
            .require("workflows.replace", V9)
            .and_then(|_| require_segment("workflow id", workflow_id))
            .and_then(|_| named_document(workflow))
            .map(|body| ApiRequest::put(format!("workflows/{}", workflow_id)).with_body(body));
        self.client.dispatch(request)
    }

    pub fn delete(&self, workflow_id: &str) -> C::Response<'a> {
        let request = self
            .client
            .require("workflows.delete", V9)
            .and_then(|_| require_segment("workflow id", workflow_id))
            .map(|_| ApiRequest::delete(format!("workflows/{}", workflow_id)));
        self.client.dispatch(request)
    }
}

fn document(value: &Value) -> Result<Body> {
    if !value.is_object() {
        return Err(SwarmError::invalid("workflow must be a JSON object"));
    }
    Ok(Body::Json(value.clone()))
}

fn named_document(value: &Value) -> Result<Body> {
    let name = value.get("name").and_then(Value::as_str).unwrap_or_default();
    require_non_empty("workflow name", name)?;
    document(value)
}
