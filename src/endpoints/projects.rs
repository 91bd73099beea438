use serde::{Deserialize, Serialize};

use crate::domain::model::ApiRequest;
use crate::domain::params::{Payload, Query};
use crate::domain::ports::Dispatch;
use crate::endpoints::{require_non_empty, require_segment, V4, V9};
use crate::utils::error::{Result, SwarmError};

/// Project settings shared by `create` and `edit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSettings {
    pub name: Option<String>,
    pub members: Vec<String>,
    pub subgroups: Vec<String>,
    pub owners: Vec<String>,
    pub description: Option<String>,
    pub private: Option<bool>,
    pub deploy_url: Option<String>,
    pub tests_url: Option<String>,
    pub jobview: Option<String>,
    /// Email project members when a change is committed.
    pub email_members: Option<bool>,
    /// Email members and moderators about new reviews.
    pub email_users: Option<bool>,
    pub workflow: Option<String>,
    pub retain_default_reviewers: Option<bool>,
}

impl ProjectSettings {
    fn write(&self, payload: &mut Payload) {
        payload
            .insert_str("name", self.name.as_deref())
            .insert_list("members", &self.members)
            .insert_list("subgroups", &self.subgroups)
            .insert_list("owners", &self.owners)
            .insert_str("description", self.description.as_deref())
            .insert_opt("private", self.private)
            .insert_str("jobview", self.jobview.as_deref())
            .insert_opt(
                "emailFlags[change_email_project_users]",
                self.email_members,
            )
            .insert_opt("emailFlags[review_email_project_members]", self.email_users)
            .insert_str("workflow", self.workflow.as_deref())
            .insert_opt("retainDefaultReviewers", self.retain_default_reviewers);

        if let Some(url) = self.deploy_url.as_deref().filter(|u| !u.is_empty()) {
            payload
                .insert("deploy[enabled]", true)
                .insert("deploy[url]", url);
        }
        if let Some(url) = self.tests_url.as_deref().filter(|u| !u.is_empty()) {
            payload
                .insert("tests[enabled]", true)
                .insert("tests[url]", url);
        }
    }
}

pub struct Projects<'a, C> {
    client: &'a C,
}

impl<'a, C: Dispatch> Projects<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// List projects, optionally only those using `workflow` (v9+).
    pub fn list(&self, fields: &[&str], workflow: Option<&str>) -> C::Response<'a> {
        let request = match workflow {
            Some(_) => self.client.require("projects.list workflow filter", V9),
            None => Ok(()),
        }
        .map(|_| {
            let mut query = Query::new();
            query.push_fields(fields).push_str("workflow", workflow);
            ApiRequest::get("projects").with_query(query)
        });
        self.client.dispatch(request)
    }

    pub fn get(&self, project_id: &str, fields: &[&str]) -> C::Response<'a> {
        let request = require_segment("project id", project_id).map(|_| {
            let mut query = Query::new();
            query.push_fields(fields);
            ApiRequest::get(format!("projects/{}", project_id)).with_query(query)
        });
        self.client.dispatch(request)
    }

    /// Create a project. Needs a name and at least one member or subgroup.
    pub fn create(&self, settings: &ProjectSettings) -> C::Response<'a> {
        self.client.dispatch(self.create_request(settings))
    }

    fn create_request(&self, settings: &ProjectSettings) -> Result<ApiRequest> {
        require_non_empty("name", settings.name.as_deref().unwrap_or_default())?;
        if settings.members.is_empty() && settings.subgroups.is_empty() {
            return Err(SwarmError::invalid(
                "at least one of members or subgroups is required",
            ));
        }
        self.check_versions("projects.create", settings)?;

        let mut payload = Payload::new();
        settings.write(&mut payload);
        Ok(ApiRequest::post("projects").with_body(payload.into_form()))
    }

    /// Change project settings. Only members or owners may do this.
    pub fn edit(&self, project_id: &str, settings: &ProjectSettings) -> C::Response<'a> {
        self.client.dispatch(self.edit_request(project_id, settings))
    }

    fn edit_request(&self, project_id: &str, settings: &ProjectSettings) -> Result<ApiRequest> {
        require_segment("project id", project_id)?;
        self.check_versions("projects.edit", settings)?;

        let mut payload = Payload::new();
        settings.write(&mut payload);
        if payload.is_empty() {
            return Err(SwarmError::invalid("no project settings to change"));
        }
        Ok(ApiRequest::patch(format!("projects/{}", project_id)).with_body(payload.into_form()))
    }

    /// Mark a project deleted. Only super users and owners may do this.
    pub fn delete(&self, project_id: &str) -> C::Response<'a> {
        let request = require_segment("project id", project_id)
            .map(|_| ApiRequest::delete(format!("projects/{}", project_id)));
        self.client.dispatch(request)
    }

    fn check_versions(&self, operation: &str, settings: &ProjectSettings) -> Result<()> {
        if !settings.subgroups.is_empty() {
            self.client.require(&format!("{} subgroups", operation), V4)?;
        }
        if settings.workflow.is_some() {
            self.client.require(&format!("{} workflow", operation), V9)?;
        }
        Ok(())
    }
}
