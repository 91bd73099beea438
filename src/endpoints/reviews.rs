use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::model::ApiRequest;
use crate::domain::params::{Payload, Query};
use crate::domain::ports::Dispatch;
use crate::endpoints::{require_non_empty, V1_1, V2, V5, V6, V7, V9};
use crate::utils::error::{Result, SwarmError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Filters for `GET reviews`.
///
/// List filters go out as repeated `key[]` parameters (`ids[]=1&ids[]=2`),
/// the array form Swarm parses. Flags are sent as `1`/`0`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewQuery {
    /// Review id to seek past, usually `lastSeen` from the previous page.
    pub after: Option<u64>,
    pub limit: Option<u32>,
    pub fields: Vec<String>,
    pub authors: Vec<String>,
    pub changes: Vec<u64>,
    pub has_reviewers: Option<bool>,
    /// Cannot be combined with `limit`.
    pub ids: Vec<u64>,
    pub keywords: Option<String>,
    pub participants: Vec<String>,
    pub projects: Vec<String>,
    pub states: Vec<String>,
    pub passes_tests: Option<bool>,
    pub not_updated_since: Option<NaiveDate>,
    pub has_voted: Option<VoteFilter>,
    pub my_comments: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteFilter {
    Up,
    Down,
}

impl fmt::Display for VoteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteFilter::Up => write!(f, "up"),
            VoteFilter::Down => write!(f, "down"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewReview {
    /// Defaults to the change description on the server.
    pub description: Option<String>,
    pub reviewers: Vec<String>,
    pub required_reviewers: Vec<String>,
    pub reviewer_groups: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Up,
    Down,
    Clear,
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vote::Up => write!(f, "up"),
            Vote::Down => write!(f, "down"),
            Vote::Clear => write!(f, "clear"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewUpdate {
    pub author: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeMode {
    Append,
    Replace,
}

impl fmt::Display for ChangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeMode::Append => write!(f, "append"),
            ChangeMode::Replace => write!(f, "replace"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewState {
    NeedsReview,
    NeedsRevision,
    Approved,
    Archived,
    Rejected,
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            ReviewState::NeedsReview => "needsReview",
            ReviewState::NeedsRevision => "needsRevision",
            ReviewState::Approved => "approved",
            ReviewState::Archived => "archived",
            ReviewState::Rejected => "rejected",
        };
        f.write_str(state)
    }
}

/// `PATCH reviews/{id}/state`. The commit options only apply to `approved`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateChange {
    pub state: ReviewState,
    pub description: Option<String>,
    pub commit: bool,
    pub wait: bool,
    pub jobs: Vec<String>,
    pub fix_status: Option<String>,
}

impl StateChange {
    pub fn new(state: ReviewState) -> Self {
        Self {
            state,
            description: None,
            commit: false,
            wait: false,
            jobs: Vec::new(),
            fix_status: None,
        }
    }
}

pub struct Reviews<'a, C> {
    client: &'a C,
}

impl<'a, C: Dispatch> Reviews<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// List reviews matching `query`.
    pub fn list(&self, query: &ReviewQuery) -> C::Response<'a> {
        self.client.dispatch(self.list_request(query))
    }

    fn list_request(&self, q: &ReviewQuery) -> Result<ApiRequest> {
        if !q.authors.is_empty() {
            self.client.require("reviews.list author filter", V2)?;
        }
        if !q.ids.is_empty() && q.limit.is_some() {
            return Err(SwarmError::invalid("ids cannot be combined with limit"));
        }

        let mut query = Query::new();
        query
            .push_opt("after", q.after)
            .push_opt("max", q.limit)
            .push_fields(&q.fields)
            .push_list("author", &q.authors)
            .push_list("change", &q.changes)
            .push_flag("hasReviewers", q.has_reviewers)
            .push_list("ids", &q.ids)
            .push_str("keywords", q.keywords.as_deref())
            .push_list("participants", &q.participants)
            .push_list("project", &q.projects)
            .push_list("state", &q.states)
            .push_flag("passesTests", q.passes_tests)
            .push_opt(
                "notUpdatedSince",
                q.not_updated_since.map(|d| d.format(DATE_FORMAT)),
            )
            .push_opt("hasVoted", q.has_voted)
            .push_flag("myComments", q.my_comments);

        Ok(ApiRequest::get("reviews").with_query(query))
    }

    /// Fetch a single review.
    pub fn get(&self, review_id: u64, fields: &[&str]) -> C::Response<'a> {
        let mut query = Query::new();
        query.push_fields(fields);
        self.client
            .dispatch(Ok(ApiRequest::get(format!("reviews/{}", review_id)).with_query(query)))
    }

    /// Transitions the current user may apply. `up_voters` are users whose
    /// up vote is assumed when working out the result.
    pub fn transitions(&self, review_id: u64, up_voters: Option<&str>) -> C::Response<'a> {
        let request = self
            .client
            .require("reviews.transitions", V9)
            .map(|_| {
                let mut query = Query::new();
                query.push_str("upVoters", up_voters);
                ApiRequest::get(format!("reviews/{}/transitions", review_id)).with_query(query)
            });
        self.client.dispatch(request)
    }

    /// Reviews for the current user's dashboard.
    pub fn dashboard(&self, fields: &[&str]) -> C::Response<'a> {
        let request = self.client.require("reviews.dashboard", V6).map(|_| {
            let mut query = Query::new();
            query.push_fields(fields);
            ApiRequest::get("reviews/dashboard").with_query(query)
        });
        self.client.dispatch(request)
    }

    /// Start a review from a change.
    pub fn create(&self, change: u64, review: &NewReview) -> C::Response<'a> {
        self.client.dispatch(self.create_request(change, review))
    }

    fn create_request(&self, change: u64, review: &NewReview) -> Result<ApiRequest> {
        if !review.required_reviewers.is_empty() {
            self.client.require("reviews.create required_reviewers", V1_1)?;
        }
        if !review.reviewer_groups.is_empty() {
            self.client.require("reviews.create reviewer_groups", V7)?;
        }

        let mut payload = Payload::new();
        payload
            .insert("change", change)
            .insert_str("description", review.description.as_deref())
            .insert_list("reviewers", &review.reviewers)
            .insert_list("requiredReviewers", &review.required_reviewers)
            .insert_list("reviewerGroups", &review.reviewer_groups);

        Ok(ApiRequest::post("reviews").with_body(payload.into_form()))
    }

    /// Archive reviews not updated since the given date. `description` is
    /// posted as a comment on each archived review.
    pub fn archive(&self, not_updated_since: NaiveDate, description: &str) -> C::Response<'a> {
        let request = self
            .client
            .require("reviews.archive", V6)
            .and_then(|_| require_non_empty("description", description))
            .map(|_| {
                let mut payload = Payload::new();
                payload
                    .insert(
                        "notUpdatedSince",
                        not_updated_since.format(DATE_FORMAT).to_string(),
                    )
                    .insert("description", description);
                ApiRequest::post("reviews/archive").with_body(payload.into_form())
            });
        self.client.dispatch(request)
    }

    /// Clean up a committed review; with `reopen` the files are reopened
    /// into the default changelist.
    pub fn cleanup(&self, review_id: u64, reopen: bool) -> C::Response<'a> {
        let request = self.client.require("reviews.cleanup", V6).map(|_| {
            let mut payload = Payload::new();
            if reopen {
                payload.insert("reopen", true);
            }
            ApiRequest::post(format!("reviews/{}/cleanup", review_id))
                .with_body(payload.into_form())
        });
        self.client.dispatch(request)
    }

    pub fn vote(&self, review_id: u64, vote: Vote, version: Option<u32>) -> C::Response<'a> {
        let request = self.client.require("reviews.vote", V5).map(|_| {
            let mut payload = Payload::new();
            payload
                .insert("vote[value]", vote.to_string())
                .insert_opt("vote[version]", version);
            ApiRequest::post(format!("reviews/{}/vote", review_id)).with_body(payload.into_form())
        });
        self.client.dispatch(request)
    }

    /// Remove a review and its history. Cannot be undone.
    pub fn obliterate(&self, review_id: u64) -> C::Response<'a> {
        let request = self
            .client
            .require("reviews.obliterate", V9)
            .map(|_| ApiRequest::post(format!("reviews/{}/obliterate", review_id)));
        self.client.dispatch(request)
    }

    /// Change the author and/or description of a review.
    pub fn update(&self, review_id: u64, update: &ReviewUpdate) -> C::Response<'a> {
        self.client.dispatch(self.update_request(review_id, update))
    }

    fn update_request(&self, review_id: u64, update: &ReviewUpdate) -> Result<ApiRequest> {
        if update.author.is_some() {
            self.client.require("reviews.update author", V2)?;
        }

        let mut payload = Payload::new();
        payload
            .insert_str("author", update.author.as_deref())
            .insert_str("description", update.description.as_deref());

        if payload.is_empty() {
            return Err(SwarmError::invalid(
                "at least one of author or description is required",
            ));
        }

        Ok(ApiRequest::patch(format!("reviews/{}", review_id)).with_body(payload.into_form()))
    }

    /// Attach a change to a review, appending to or replacing its files.
    pub fn add_change(&self, review_id: u64, change: u64, mode: Option<ChangeMode>) -> C::Response<'a> {
        let request = match mode {
            Some(_) => self.client.require("reviews.add_change mode", V2),
            None => Ok(()),
        }
        .map(|_| {
            let mut payload = Payload::new();
            payload
                .insert("change", change)
                .insert_opt("mode", mode.map(|m| m.to_string()));
            ApiRequest::post(format!("reviews/{}/changes", review_id))
                .with_body(payload.into_form())
        });
        self.client.dispatch(request)
    }

    /// Transition a review to a new state, optionally committing it.
    pub fn update_state(&self, review_id: u64, change: &StateChange) -> C::Response<'a> {
        self.client.dispatch(self.update_state_request(review_id, change))
    }

    fn update_state_request(&self, review_id: u64, change: &StateChange) -> Result<ApiRequest> {
        let commit_options = change.commit
            || change.wait
            || !change.jobs.is_empty()
            || change.fix_status.is_some();

        if commit_options {
            if change.state != ReviewState::Approved {
                return Err(SwarmError::invalid(
                    "commit, wait, jobs and fix_status require the approved state",
                ));
            }
            self.client.require("reviews.update_state commit options", V2)?;
        }

        let mut payload = Payload::new();
        payload
            .insert("state", change.state.to_string())
            .insert_str("description", change.description.as_deref());
        if change.commit {
            payload.insert("commit", true);
        }
        if change.wait {
            payload.insert("wait", true);
        }
        payload
            .insert_list("jobs", &change.jobs)
            .insert_str("fixStatus", change.fix_status.as_deref());

        Ok(ApiRequest::patch(format!("reviews/{}/state", review_id)).with_body(payload.into_form()))
    }
}
