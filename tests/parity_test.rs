#![cfg(feature = "blocking")]

//! The async and blocking clients must put identical requests on the wire.

use chrono::NaiveDate;
use helix_swarm::endpoints::activity::{Activity, ActivityQuery, NewActivity};
use helix_swarm::endpoints::changes::Changes;
use helix_swarm::endpoints::comments::{CommentEdit, CommentQuery, Comments, NewComment};
use helix_swarm::endpoints::groups::{GroupQuery, GroupSettings, Groups};
use helix_swarm::endpoints::projects::{ProjectSettings, Projects};
use helix_swarm::endpoints::reviews::{
    ChangeMode, NewReview, ReviewQuery, ReviewState, ReviewUpdate, Reviews, StateChange, Vote,
};
use helix_swarm::endpoints::servers::Servers;
use helix_swarm::endpoints::workflows::Workflows;
use helix_swarm::{ApiRequest, ApiVersion, BlockingSwarmClient, Dispatch, Result, SwarmClient};
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;

/// Captures the request a namespace builds instead of sending it.
struct Recorder(ApiVersion);

impl Dispatch for Recorder {
    type Response<'a> = Result<ApiRequest>
    where
        Self: 'a;

    fn api_version(&self) -> ApiVersion {
        self.0
    }

    fn dispatch(&self, request: Result<ApiRequest>) -> Self::Response<'_> {
        request
    }
}

fn sample_requests(version: u32) -> Vec<ApiRequest> {
    let swarm = Recorder(ApiVersion::new(version, 0));
    let group = GroupSettings {
        users: vec!["alice".to_string(), "bob".to_string()],
        description: Some("Core team".to_string()),
        notify_commits: Some(true),
        ..Default::default()
    };
    let project = ProjectSettings {
        name: Some("Jam".to_string()),
        members: vec!["alice".to_string()],
        deploy_url: Some("http://deploy/{change}".to_string()),
        ..Default::default()
    };
    let mut approve = StateChange::new(ReviewState::Approved);
    approve.commit = true;

    let results = vec![
        Reviews::new(&swarm).get(12345, &[]),
        Reviews::new(&swarm).get(12345, &["id", "state"]),
        Reviews::new(&swarm).list(&ReviewQuery {
            limit: Some(10),
            projects: vec!["jam".to_string()],
            has_reviewers: Some(true),
            not_updated_since: NaiveDate::from_ymd_opt(2017, 1, 1),
            ..Default::default()
        }),
        Reviews::new(&swarm).create(
            42,
            &NewReview {
                reviewers: vec!["bob".to_string(), "carol".to_string()],
                ..Default::default()
            },
        ),
        Reviews::new(&swarm).vote(1, Vote::Up, Some(3)),
        Reviews::new(&swarm).update(
            1,
            &ReviewUpdate {
                description: Some("Updated & improved".to_string()),
                ..Default::default()
            },
        ),
        Reviews::new(&swarm).add_change(1, 43, Some(ChangeMode::Append)),
        Reviews::new(&swarm).update_state(1, &approve),
        Comments::new(&swarm).list(&CommentQuery {
            topic: Some("reviews/1".to_string()),
            ..Default::default()
        }),
        Comments::new(&swarm).add(&NewComment::new("reviews/1", "Ship it")),
        Comments::new(&swarm).edit(
            9,
            &CommentEdit {
                body: "Edited".to_string(),
                ..Default::default()
            },
        ),
        Projects::new(&swarm).create(&project),
        Projects::new(&swarm).delete("jam"),
        Groups::new(&swarm).list(&GroupQuery {
            keywords: Some("core".to_string()),
            ..Default::default()
        }),
        Groups::new(&swarm).create("core", &group),
        Groups::new(&swarm).edit("core", &group),
        Activity::new(&swarm).list(&ActivityQuery {
            stream: Some("user-alice".to_string()),
            ..Default::default()
        }),
        Activity::new(&swarm).create(&NewActivity {
            category: "job".to_string(),
            user: "ci".to_string(),
            action: "built".to_string(),
            target: "change 42".to_string(),
            ..Default::default()
        }),
        Changes::new(&swarm).affects_projects(42),
        Servers::new(&swarm).list(),
    ];

    let mut requests: Vec<ApiRequest> = results.into_iter().collect::<Result<_>>().unwrap();

    if version >= 9 {
        requests.push(
            Workflows::new(&swarm)
                .create(&json!({"name": "strict", "shared": true}))
                .unwrap(),
        );
    }
    requests
}

#[test]
fn test_prepared_requests_are_identical() {
    for version in [9, 11] {
        let url = format!("https://swarm.example.com/api/v{}", version);
        let async_client = SwarmClient::new(&url, "alice", "ticket").unwrap();
        let blocking_client = BlockingSwarmClient::new(&url, "alice", "ticket").unwrap();

        for request in sample_requests(version) {
            let a = async_client.prepare(&request).unwrap();
            let b = blocking_client.prepare(&request).unwrap();

            assert_eq!(a.method(), b.method(), "method of {}", request.path);
            assert_eq!(a.url(), b.url(), "url of {}", request.path);
            assert_eq!(a.headers(), b.headers(), "headers of {}", request.path);
            assert_eq!(
                a.body().and_then(|body| body.as_bytes()),
                b.body().and_then(|body| body.as_bytes()),
                "body of {}",
                request.path
            );
        }
    }
}

#[test]
fn test_both_clients_hit_the_same_endpoint() {
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/api/v9/reviews/5")
            .header("authorization", "Basic YWxpY2U6dGlja2V0")
            .x_www_form_urlencoded_tuple("author", "bob");
        then.status(200).json_body(json!({"review": {"id": 5, "author": "bob"}}));
    });

    let url = server.url("/api/v9");
    let update = ReviewUpdate {
        author: Some("bob".to_string()),
        ..Default::default()
    };

    let blocking_client = BlockingSwarmClient::new(&url, "alice", "ticket").unwrap();
    let from_blocking = blocking_client.reviews().update(5, &update).unwrap();

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let async_client = SwarmClient::new(&url, "alice", "ticket").unwrap();
    let from_async = runtime
        .block_on(async_client.reviews().update(5, &update))
        .unwrap();

    assert_eq!(api_mock.hits(), 2);
    assert_eq!(from_blocking, from_async);
}

#[test]
fn test_both_clients_reject_the_same_input() {
    let url = "http://127.0.0.1:1/api/v6";
    let blocking_client = BlockingSwarmClient::new(url, "alice", "ticket").unwrap();
    let async_client = SwarmClient::new(url, "alice", "ticket").unwrap();
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let blocking_err = blocking_client.reviews().obliterate(1).unwrap_err();
    let async_err = runtime
        .block_on(async_client.reviews().obliterate(1))
        .unwrap_err();

    assert_eq!(blocking_err.to_string(), async_err.to_string());
}
