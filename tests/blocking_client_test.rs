#![cfg(feature = "blocking")]

use helix_swarm::endpoints::reviews::{NewReview, ReviewState, StateChange, Vote};
use helix_swarm::{BlockingSwarmClient, ClientConfig, SwarmError};
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;

fn client(server: &MockServer, version: &str) -> BlockingSwarmClient {
    BlockingSwarmClient::new(&server.url(format!("/api/{}", version)), "user", "pass").unwrap()
}

#[test]
fn test_get_review() {
    let server = MockServer::start();
    let body = json!({"review": {"id": 12345, "state": "approved"}});

    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v9/reviews/12345")
            .header("authorization", "Basic dXNlcjpwYXNz");
        then.status(200).json_body(body.clone());
    });

    let swarm = client(&server, "v9");
    let review = swarm.reviews().get(12345, &[]).unwrap();

    api_mock.assert();
    assert_eq!(review, body);
}

#[test]
fn test_create_review_form() {
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v9/reviews")
            .x_www_form_urlencoded_tuple("change", "42")
            .x_www_form_urlencoded_tuple("description", "Please review");
        then.status(200).json_body(json!({"review": {"id": 43}}));
    });

    let swarm = client(&server, "v9");
    let review = NewReview {
        description: Some("Please review".to_string()),
        ..Default::default()
    };
    let created = swarm.reviews().create(42, &review).unwrap();

    api_mock.assert();
    assert_eq!(created["review"]["id"], 43);
}

#[test]
fn test_vote_and_state() {
    let server = MockServer::start();

    let vote_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v9/reviews/7/vote")
            .x_www_form_urlencoded_tuple("vote[value]", "down");
        then.status(200).json_body(json!({"isValid": true}));
    });
    let state_mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/api/v9/reviews/7/state")
            .x_www_form_urlencoded_tuple("state", "needsRevision");
        then.status(200).json_body(json!({"review": {"state": "needsRevision"}}));
    });

    let swarm = client(&server, "v9");
    swarm.reviews().vote(7, Vote::Down, None).unwrap();
    let review = swarm
        .reviews()
        .update_state(7, &StateChange::new(ReviewState::NeedsRevision))
        .unwrap();

    vote_mock.assert();
    state_mock.assert();
    assert_eq!(review["review"]["state"], "needsRevision");
}

#[test]
fn test_forbidden_is_a_request_error() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(DELETE).path("/api/v9/groups/admins");
        then.status(403).body(r#"{"error":"Forbidden"}"#);
    });

    let swarm = client(&server, "v9");
    let err = swarm.groups().delete("admins").unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(err.body(), Some(r#"{"error":"Forbidden"}"#));
    assert!(!err.is_connection());
}

#[test]
fn test_connection_refused() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let swarm =
        BlockingSwarmClient::new(&format!("http://127.0.0.1:{}/api/v9", port), "user", "pass")
            .unwrap();
    let err = swarm.version().unwrap_err();

    assert!(matches!(err, SwarmError::Connection(_)));
}

#[test]
fn test_invalid_base_url() {
    let err = BlockingSwarmClient::new("http://server/api", "user", "pass").unwrap_err();
    assert!(matches!(err, SwarmError::InvalidUrl { .. }));
}

#[test]
fn test_close_releases_client() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/v9/servers");
        then.status(200).json_body(json!({"servers": []}));
    });

    let swarm = client(&server, "v9");
    swarm.servers().list().unwrap();
    swarm.close();

    api_mock.assert();
}

#[test]
fn test_from_config_rejects_zero_timeout() {
    let mut config = ClientConfig::new("http://server/api/v9", "user", "pass");
    config.timeout_secs = Some(0);

    let err = BlockingSwarmClient::from_config(&config).unwrap_err();
    assert!(matches!(err, SwarmError::Config { ref field, .. } if field == "timeout_secs"));
}
