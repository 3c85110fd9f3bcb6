//! Integration tests for profile aggregation
//!
//! These tests drive the full aggregation flow against mocked GitHub and
//! Bitbucket upstreams: page walking, per-repo enrichment, folding, and
//! failure propagation.

use repoprofile::config::ServiceConfig;
use repoprofile::profile::ProfileService;
use repoprofile::ProfileError;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_service(github: &MockServer, bitbucket: &MockServer) -> ProfileService {
    let config = ServiceConfig {
        github_api_url: github.uri(),
        bitbucket_api_url: bitbucket.uri(),
        github_token: Some("secret-token".to_string()),
        ..ServiceConfig::default()
    };
    ProfileService::new(config).unwrap()
}

/// Mount one page of the GitHub list endpoint for `org`.
async fn mount_github_page(server: &MockServer, org: &str, page: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/orgs/{}/repos", org)))
        .and(query_param("type", "public"))
        .and(query_param("page", page))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount the topics endpoint for one repo.
async fn mount_github_topics(server: &MockServer, org: &str, repo: &str, topics: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/topics", org, repo)))
        .and(header("Accept", "application/vnd.github.mercy-preview+json"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "names": topics })))
        .mount(server)
        .await;
}

/// Mount one page of the Bitbucket list endpoint for `workspace`.
async fn mount_bitbucket_page(
    server: &MockServer,
    workspace: &str,
    page: &str,
    body: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path(format!("/repositories/{}", workspace)))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn github_repo(server: &MockServer, org: &str, name: &str, fork: bool, watchers: u64, language: &str) -> serde_json::Value {
    json!({
        "name": name,
        "fork": fork,
        "watchers": watchers,
        "language": language,
        "url": format!("{}/repos/{}/{}", server.uri(), org, name),
    })
}

fn bitbucket_repo(server: &MockServer, name: &str, is_private: bool, language: &str) -> serde_json::Value {
    json!({
        "name": name,
        "is_private": is_private,
        "language": language,
        "links": {
            "watchers": { "href": format!("{}/watchers/{}", server.uri(), name) },
        },
    })
}

#[tokio::test]
async fn test_full_profile_merges_both_sources() {
    let github = MockServer::start().await;
    let bitbucket = MockServer::start().await;

    mount_github_page(
        &github,
        "acme",
        "1",
        json!([
            github_repo(&github, "acme", "alpha", false, 10, "Go"),
            github_repo(&github, "acme", "beta", false, 4, "Rust"),
            github_repo(&github, "acme", "gamma", true, 1, "Go"),
        ]),
    )
    .await;
    mount_github_page(&github, "acme", "2", json!([])).await;
    mount_github_topics(&github, "acme", "alpha", &["infra"]).await;
    mount_github_topics(&github, "acme", "beta", &["infra"]).await;
    mount_github_topics(&github, "acme", "gamma", &["infra"]).await;

    mount_bitbucket_page(
        &bitbucket,
        "acme",
        "1",
        json!({
            "values": [
                bitbucket_repo(&bitbucket, "delta", false, "Python"),
                bitbucket_repo(&bitbucket, "epsilon", true, "Java"),
            ],
        }),
    )
    .await;
    mount_bitbucket_page(&bitbucket, "acme", "2", json!({ "values": [] })).await;
    Mock::given(method("GET"))
        .and(path("/watchers/delta"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "size": 6 })))
        .mount(&bitbucket)
        .await;
    Mock::given(method("GET"))
        .and(path("/watchers/epsilon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "size": 3 })))
        .mount(&bitbucket)
        .await;

    let service = test_service(&github, &bitbucket);
    let summary = service.build_profile("acme", "acme").await.unwrap();

    assert_eq!(summary.repos.original, 3);
    assert_eq!(summary.repos.forked, 1);
    // Private epsilon's watchers are fetched but never folded
    assert_eq!(summary.watchers, 10 + 4 + 1 + 6);
    assert_eq!(summary.languages.get("go"), Some(&2));
    assert_eq!(summary.languages.get("rust"), Some(&1));
    assert_eq!(summary.languages.get("python"), Some(&1));
    assert!(summary.languages.get("java").is_none());
    assert_eq!(summary.topics.get("infra"), Some(&3));
    assert_eq!(summary.sources.get("github"), Some(&3));
    assert_eq!(summary.sources.get("bitbucket"), Some(&1));
}

#[tokio::test]
async fn test_pagination_walks_until_empty_page() {
    let github = MockServer::start().await;
    let bitbucket = MockServer::start().await;

    mount_github_page(
        &github,
        "acme",
        "1",
        json!([github_repo(&github, "acme", "alpha", false, 0, "Go")]),
    )
    .await;
    mount_github_page(
        &github,
        "acme",
        "2",
        json!([github_repo(&github, "acme", "beta", false, 0, "Go")]),
    )
    .await;
    mount_github_page(&github, "acme", "3", json!([])).await;
    mount_github_topics(&github, "acme", "alpha", &[]).await;
    mount_github_topics(&github, "acme", "beta", &[]).await;

    mount_bitbucket_page(&bitbucket, "acme", "1", json!({ "values": [] })).await;

    let service = test_service(&github, &bitbucket);
    let summary = service.build_profile("acme", "acme").await.unwrap();

    assert_eq!(summary.sources.get("github"), Some(&2));
    assert_eq!(summary.languages.get("go"), Some(&2));
}

#[tokio::test]
async fn test_missing_github_org_fails_with_404() {
    let github = MockServer::start().await;
    let bitbucket = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/ghost/repos"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&github)
        .await;
    mount_bitbucket_page(&bitbucket, "acme", "1", json!({ "values": [] })).await;

    let service = test_service(&github, &bitbucket);
    let err = service.build_profile("ghost", "acme").await.unwrap_err();

    assert_eq!(err.upstream_status(), Some(404));
    let msg = err.to_string();
    assert!(msg.contains("github repos for ghost"));
    assert!(msg.contains("Not Found"));
}

#[tokio::test]
async fn test_enrichment_failure_fails_the_whole_build() {
    let github = MockServer::start().await;
    let bitbucket = MockServer::start().await;

    mount_github_page(
        &github,
        "acme",
        "1",
        json!([github_repo(&github, "acme", "alpha", false, 0, "Go")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/alpha/topics"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&github)
        .await;

    mount_bitbucket_page(&bitbucket, "acme", "1", json!({ "values": [] })).await;

    let service = test_service(&github, &bitbucket);
    let err = service.build_profile("acme", "acme").await.unwrap_err();

    assert_eq!(err.upstream_status(), Some(500));
    assert!(err.to_string().contains("github topics pull"));
}

#[tokio::test]
async fn test_missing_watchers_link_defaults_to_zero() {
    let github = MockServer::start().await;
    let bitbucket = MockServer::start().await;

    mount_github_page(&github, "acme", "1", json!([])).await;
    mount_bitbucket_page(
        &bitbucket,
        "acme",
        "1",
        json!({
            "values": [
                { "name": "delta", "is_private": false, "language": "Python", "links": {} },
            ],
        }),
    )
    .await;
    mount_bitbucket_page(&bitbucket, "acme", "2", json!({ "values": [] })).await;

    let service = test_service(&github, &bitbucket);
    let summary = service.build_profile("acme", "acme").await.unwrap();

    assert_eq!(summary.watchers, 0);
    assert_eq!(summary.sources.get("bitbucket"), Some(&1));
}

#[tokio::test]
async fn test_page_guard_trips_on_endless_upstream() {
    let github = MockServer::start().await;
    let bitbucket = MockServer::start().await;

    // Same non-empty page for every page number, no topics needed
    Mock::given(method("GET"))
        .and(path("/orgs/acme/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "alpha", "fork": false, "watchers": 0 },
        ])))
        .mount(&github)
        .await;
    mount_bitbucket_page(&bitbucket, "acme", "1", json!({ "values": [] })).await;

    let config = ServiceConfig {
        github_api_url: github.uri(),
        bitbucket_api_url: bitbucket.uri(),
        github_token: Some("secret-token".to_string()),
        max_pages: 3,
        ..ServiceConfig::default()
    };
    let service = ProfileService::new(config).unwrap();

    let err = service.build_profile("acme", "acme").await.unwrap_err();

    assert!(matches!(err, ProfileError::PageLimit { limit: 3, .. }));
    assert_eq!(err.upstream_status(), None);
}
