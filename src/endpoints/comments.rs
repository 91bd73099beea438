use serde::{Deserialize, Serialize};

use crate::domain::model::ApiRequest;
use crate::domain::params::{Payload, Query};
use crate::domain::ports::Dispatch;
use crate::endpoints::{require_non_empty, V7};
use crate::utils::error::Result;

/// Filters for `GET comments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentQuery {
    pub after: Option<u64>,
    pub limit: Option<u32>,
    /// e.g. `reviews/1234` or `changes/1234`.
    pub topic: Option<String>,
    pub context_version: Option<u32>,
    pub ignore_archived: Option<bool>,
    pub tasks_only: Option<bool>,
    pub task_states: Vec<String>,
    pub fields: Vec<String>,
}

/// Where an inline comment is anchored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentContext {
    pub file: Option<String>,
    pub left_line: Option<u32>,
    pub right_line: Option<u32>,
    pub content: Vec<String>,
    pub version: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewComment {
    pub topic: String,
    pub body: String,
    pub silence_notification: bool,
    pub delay_notification: bool,
    pub task_state: Option<String>,
    pub flags: Vec<String>,
    pub context: Option<CommentContext>,
}

impl NewComment {
    pub fn new(topic: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            body: body.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentEdit {
    pub body: String,
    pub topic: Option<String>,
    pub task_state: Option<String>,
    pub flags: Vec<String>,
    pub silence_notification: bool,
    pub delay_notification: bool,
}

pub struct Comments<'a, C> {
    client: &'a C,
}

impl<'a, C: Dispatch> Comments<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub fn list(&self, q: &CommentQuery) -> C::Response<'a> {
        let mut query = Query::new();
        query
            .push_opt("after", q.after)
            .push_opt("max", q.limit)
            .push_str("topic", q.topic.as_deref())
            .push_opt("context[version]", q.context_version)
            .push_flag("ignoreArchived", q.ignore_archived)
            .push_flag("tasksOnly", q.tasks_only)
            .push_list("taskStates", &q.task_states)
            .push_fields(&q.fields);

        self.client
            .dispatch(Ok(ApiRequest::get("comments").with_query(query)))
    }

    pub fn add(&self, comment: &NewComment) -> C::Response<'a> {
        self.client.dispatch(self.add_request(comment))
    }

    fn add_request(&self, comment: &NewComment) -> Result<ApiRequest> {
        require_non_empty("topic", &comment.topic)?;
        require_non_empty("body", &comment.body)?;
        if comment.delay_notification {
            self.client.require("comments.add delay_notification", V7)?;
        }

        let mut payload = Payload::new();
        payload
            .insert("topic", comment.topic.as_str())
            .insert("body", comment.body.as_str())
            .insert_str("taskState", comment.task_state.as_deref())
            .insert_list("flags", &comment.flags);
        notification_flags(
            &mut payload,
            comment.silence_notification,
            comment.delay_notification,
        );

        if let Some(context) = &comment.context {
            payload
                .insert_str("context[file]", context.file.as_deref())
                .insert_opt("context[leftLine]", context.left_line)
                .insert_opt("context[rightLine]", context.right_line)
                .insert_list("context[content]", &context.content)
                .insert_opt("context[version]", context.version);
        }

        Ok(ApiRequest::post("comments").with_body(payload.into_form()))
    }

    pub fn edit(&self, comment_id: u64, edit: &CommentEdit) -> C::Response<'a> {
        self.client.dispatch(self.edit_request(comment_id, edit))
    }

    fn edit_request(&self, comment_id: u64, edit: &CommentEdit) -> Result<ApiRequest> {
        require_non_empty("body", &edit.body)?;
        if edit.delay_notification {
            self.client.require("comments.edit delay_notification", V7)?;
        }

        let mut payload = Payload::new();
        payload
            .insert("body", edit.body.as_str())
            .insert_str("topic", edit.topic.as_deref())
            .insert_str("taskState", edit.task_state.as_deref())
            .insert_list("flags", &edit.flags);
        notification_flags(&mut payload, edit.silence_notification, edit.delay_notification);

        Ok(ApiRequest::patch(format!("comments/{}", comment_id)).with_body(payload.into_form()))
    }

    /// Send the notifications held back by `delay_notification`, for one
    /// topic or for all of them.
    pub fn notify(&self, topic: Option<&str>) -> C::Response<'a> {
        let request = self.client.require("comments.notify", V7).map(|_| {
            let mut payload = Payload::new();
            payload.insert_str("topic", topic);
            ApiRequest::post("comments/notify").with_body(payload.into_form())
        });
        self.client.dispatch(request)
    }
}

fn notification_flags(payload: &mut Payload, silence: bool, delay: bool) {
    if silence {
        payload.insert("silenceNotification", true);
    }
    if delay {
        payload.insert("delayNotification", true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Body;
    use crate::endpoints::recorder::Recorder;
    use crate::utils::error::SwarmError;
    use reqwest::Method;

    fn form(request: &ApiRequest) -> Vec<(String, String)> {
        match &request.body {
            Some(Body::Form(pairs)) => pairs.clone(),
            other => panic!("expected form body, got {:?}", other),
        }
    }

    #[test]
    fn test_list_comments_for_topic() {
        let swarm = Recorder::v(9);
        let query = CommentQuery {
            topic: Some("reviews/1234".to_string()),
            tasks_only: Some(true),
            task_states: vec!["open".to_string()],
            ..Default::default()
        };

        let request = Comments::new(&swarm).list(&query).unwrap();
        assert_eq!(request.path, "comments");
        assert_eq!(request.query.get("topic"), Some("reviews/1234"));
        assert_eq!(request.query.get("tasksOnly"), Some("1"));
        assert_eq!(request.query.get("taskStates[]"), Some("open"));
    }

    #[test]
    fn test_add_inline_comment() {
        let swarm = Recorder::v(9);
        let mut comment = NewComment::new("reviews/1234", "Typo here");
        comment.context = Some(CommentContext {
            file: Some("//depot/main/README".to_string()),
            right_line: Some(12),
            ..Default::default()
        });
        comment.silence_notification = true;

        let request = Comments::new(&swarm).add(&comment).unwrap();
        assert_eq!(request.method, Method::POST);
        let pairs = form(&request);
        assert!(pairs.contains(&("topic".to_string(), "reviews/1234".to_string())));
        assert!(pairs.contains(&("body".to_string(), "Typo here".to_string())));
        assert!(pairs.contains(&(
            "context[file]".to_string(),
            "//depot/main/README".to_string()
        )));
        assert!(pairs.contains(&("context[rightLine]".to_string(), "12".to_string())));
        assert!(pairs.contains(&("silenceNotification".to_string(), "true".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "delayNotification"));
    }

    #[test]
    fn test_add_requires_topic_and_body() {
        let swarm = Recorder::v(9);
        assert!(matches!(
            Comments::new(&swarm).add(&NewComment::new("", "body")),
            Err(SwarmError::InvalidArgument { .. })
        ));
        assert!(Comments::new(&swarm)
            .add(&NewComment::new("reviews/1", ""))
            .is_err());
    }

    #[test]
    fn test_delayed_notifications_need_v7() {
        let mut comment = NewComment::new("reviews/1", "later");
        comment.delay_notification = true;
        assert!(Comments::new(&Recorder::v(6)).add(&comment).is_err());
        assert!(Comments::new(&Recorder::v(7)).add(&comment).is_ok());
        assert!(Comments::new(&Recorder::v(6)).notify(None).is_err());

        let request = Comments::new(&Recorder::v(9))
            .notify(Some("reviews/1"))
            .unwrap();
        assert_eq!(request.path, "comments/notify");
        assert_eq!(
            form(&request),
            vec![("topic".to_string(), "reviews/1".to_string())]
        );
    }

    #[test]
    fn test_edit_comment() {
        let edit = CommentEdit {
            body: "Fixed".to_string(),
            task_state: Some("addressed".to_string()),
            ..Default::default()
        };
        let request = Comments::new(&Recorder::v(9)).edit(99, &edit).unwrap();
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.path, "comments/99");
        assert!(form(&request).contains(&("taskState".to_string(), "addressed".to_string())));
    }
}
