use serde::{Deserialize, Serialize};

use crate::domain::model::ApiRequest;
use crate::domain::params::{Payload, Query};
use crate::domain::ports::Dispatch;
use crate::endpoints::require_non_empty;
use crate::utils::error::Result;

/// Filters for `GET activity`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityQuery {
    pub change: Option<u64>,
    /// Activity stream, e.g. `user-alice` or `project-jam`.
    pub stream: Option<String>,
    /// `change`, `comment`, `job` or `review`.
    pub category: Option<String>,
    pub after: Option<u64>,
    pub limit: Option<u32>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewActivity {
    pub category: String,
    pub user: String,
    pub action: String,
    pub target: String,
    pub topic: Option<String>,
    pub description: Option<String>,
    pub change: Option<u64>,
    pub streams: Vec<String>,
    pub link: Option<String>,
}

pub struct Activity<'a, C> {
    client: &'a C,
}

impl<'a, C: Dispatch> Activity<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub fn list(&self, q: &ActivityQuery) -> C::Response<'a> {
        let mut query = Query::new();
        query
            .push_opt("change", q.change)
            .push_str("stream", q.stream.as_deref())
            .push_str("type", q.category.as_deref())
            .push_opt("after", q.after)
            .push_opt("max", q.limit)
            .push_fields(&q.fields);

        self.client
            .dispatch(Ok(ApiRequest::get("activity").with_query(query)))
    }

    /// Add an entry to the activity stream. Needs admin privileges.
    pub fn create(&self, activity: &NewActivity) -> C::Response<'a> {
        self.client.dispatch(create_request(activity))
    }
}

fn create_request(activity: &NewActivity) -> Result<ApiRequest> {
    require_non_empty("category", &activity.category)?;
    require_non_empty("user", &activity.user)?;
    require_non_empty("action", &activity.action)?;
    require_non_empty("target", &activity.target)?;

    let mut payload = Payload::new();
    payload
        .insert("type", activity.category.as_str())
        .insert("user", activity.user.as_str())
        .insert("action", activity.action.as_str())
        .insert("target", activity.target.as_str())
        .insert_str("topic", activity.topic.as_deref())
        .insert_str("description", activity.description.as_deref())
        .insert_opt("change", activity.change)
        .insert_list("streams", &activity.streams)
        .insert_str("link", activity.link.as_deref());

    Ok(ApiRequest::post("activity").with_body(payload.into_form()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Body;
    use crate::endpoints::recorder::Recorder;

    #[test]
    fn test_list_activity() {
        let query = ActivityQuery {
            stream: Some("review-1234".to_string()),
            category: Some("comment".to_string()),
            limit: Some(20),
            ..Default::default()
        };
        let request = Activity::new(&Recorder::v(9)).list(&query).unwrap();
        assert_eq!(request.path, "activity");
        assert_eq!(request.query.get("stream"), Some("review-1234"));
        assert_eq!(request.query.get("type"), Some("comment"));
        assert_eq!(request.query.get("max"), Some("20"));
    }

    #[test]
    fn test_create_activity() {
        let activity = NewActivity {
            category: "job".to_string(),
            user: "ci".to_string(),
            action: "built".to_string(),
            target: "change 42".to_string(),
            streams: vec!["user-alice".to_string()],
            ..Default::default()
        };
        let request = Activity::new(&Recorder::v(9)).create(&activity).unwrap();

        let Some(Body::Form(pairs)) = &request.body else {
            panic!("expected form body");
        };
        assert!(pairs.contains(&("type".to_string(), "job".to_string())));
        assert!(pairs.contains(&("streams[]".to_string(), "user-alice".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "link"));
    }

    #[test]
    fn test_create_requires_core_fields() {
        let activity = NewActivity {
            category: "job".to_string(),
            user: "ci".to_string(),
            ..Default::default()
        };
        assert!(Activity::new(&Recorder::v(9)).create(&activity).is_err());
    }
}
