use serde::{Deserialize, Serialize};

use crate::domain::model::ApiRequest;
use crate::domain::params::{Payload, Query};
use crate::domain::ports::Dispatch;
use crate::endpoints::{require_segment, V11, V2};
use crate::utils::error::{Result, SwarmError};

/// Filters for `GET groups`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupQuery {
    /// Group id to seek past, usually `lastSeen` from the previous page.
    pub after: Option<String>,
    pub limit: Option<u32>,
    pub fields: Vec<String>,
    /// Matches the group id, name or description.
    pub keywords: Option<String>,
}

/// Group membership and settings. Used by both `create` and `edit`; the p4
/// limits (`max_*`, `timeout`, `password_timeout`) only apply on create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupSettings {
    pub users: Vec<String>,
    pub owners: Vec<String>,
    pub subgroups: Vec<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub email_address: Option<String>,
    /// `Some(false)` is sent as `false`, so `edit` can switch a flag off.
    /// Leave it `None` to keep the server's current value.
    pub notify_reviews: Option<bool>,
    /// Same encoding as `notify_reviews`.
    pub notify_commits: Option<bool>,
    /// Same encoding as `notify_reviews`.
    pub use_mailing_list: Option<bool>,
    pub max_results: Option<u64>,
    pub max_scan_rows: Option<u64>,
    pub max_lock_time: Option<u64>,
    pub max_open_files: Option<u64>,
    pub max_memory: Option<u64>,
    pub timeout: Option<u64>,
    pub password_timeout: Option<u64>,
}

impl GroupSettings {
    fn has_members(&self) -> bool {
        !(self.users.is_empty() && self.owners.is_empty() && self.subgroups.is_empty())
    }

    fn write_members_and_config(&self, payload: &mut Payload) {
        payload
            .insert_list("Users", &self.users)
            .insert_list("Owners", &self.owners)
            .insert_list("Subgroups", &self.subgroups)
            .insert_str("config[name]", self.name.as_deref())
            .insert_str("config[description]", self.description.as_deref())
            .insert_str("config[emailAddress]", self.email_address.as_deref())
            .insert_opt("config[emailFlags][reviews]", self.notify_reviews)
            .insert_opt("config[emailFlags][commits]", self.notify_commits)
            .insert_opt("config[useMailingList]", self.use_mailing_list);
    }
}

/// Perforce groups. Every operation needs API v2+.
pub struct Groups<'a, C> {
    client: &'a C,
}

impl<'a, C: Dispatch> Groups<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub fn list(&self, q: &GroupQuery) -> C::Response<'a> {
        let request = self.client.require("groups.list", V2).map(|_| {
            let mut query = Query::new();
            query
                .push_str("after", q.after.as_deref())
                .push_opt("max", q.limit)
                .push_fields(&q.fields)
                .push_str("keywords", q.keywords.as_deref());
            ApiRequest::get("groups").with_query(query)
        });
        self.client.dispatch(request)
    }

    pub fn get(&self, group_id: &str, fields: &[&str]) -> C::Response<'a> {
        let request = self
            .client
            .require("groups.get", V2)
            .and_then(|_| require_segment("group id", group_id))
            .map(|_| {
                let mut query = Query::new();
                query.push_fields(fields);
                ApiRequest::get(format!("groups/{}", group_id)).with_query(query)
            });
        self.client.dispatch(request)
    }

    /// Create a group. At least one of users, owners or subgroups is required.
    /// API v11+ takes a JSON body, older versions a form.
    pub fn create(&self, group_id: &str, settings: &GroupSettings) -> C::Response<'a> {
        self.client.dispatch(self.create_request(group_id, settings))
    }

    fn create_request(&self, group_id: &str, settings: &GroupSettings) -> Result<ApiRequest> {
        self.client.require("groups.create", V2)?;
        require_segment("group id", group_id)?;
        if !settings.has_members() {
            return Err(SwarmError::invalid(
                "at least one of users, owners, or subgroups is required",
            ));
        }

        let mut payload = Payload::new();
        payload.insert("Group", group_id);
        settings.write_members_and_config(&mut payload);
        payload
            .insert_opt("MaxResults", settings.max_results)
            .insert_opt("MaxScanRows", settings.max_scan_rows)
            .insert_opt("MaxLockTime", settings.max_lock_time)
            .insert_opt("MaxOpenFiles", settings.max_open_files)
            .insert_opt("MaxMemory", settings.max_memory)
            .insert_opt("Timeout", settings.timeout)
            .insert_opt("PasswordTimeout", settings.password_timeout);

        let body = if self.client.api_version() >= V11 {
            payload.into_json()
        } else {
            payload.into_form()
        };
        Ok(ApiRequest::post("groups").with_body(body))
    }

    /// Change group settings. Only super users and group owners may do this.
    pub fn edit(&self, group_id: &str, settings: &GroupSettings) -> C::Response<'a> {
        let request = self
            .client
            .require("groups.edit", V2)
            .and_then(|_| require_segment("group id", group_id))
            .map(|_| {
                let mut payload = Payload::new();
                settings.write_members_and_config(&mut payload);
                ApiRequest::patch(format!("groups/{}", group_id)).with_body(payload.into_form())
            });
        self.client.dispatch(request)
    }

    pub fn delete(&self, group_id: &str) -> C::Response<'a> {
        let request = self
            .client
            .require("groups.delete", V2)
            .and_then(|_| require_segment("group id", group_id))
            .map(|_| ApiRequest::delete(format!("groups/{}", group_id)));
        self.client.dispatch(request)
    }
}
