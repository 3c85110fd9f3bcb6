//! GitHub source adapter
//!
//! Lists an organization's public repositories page by page and enriches
//! each repository with its topics, which live behind a separate per-repo
//! endpoint.

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder};
use serde::Deserialize;

use crate::config::ServiceConfig;
use crate::fetch::{enrich_each, expect_success, PageSource};
use crate::profile::ProfileSummary;
use crate::Result;

/// Key under which GitHub items are counted in `ProfileSummary::sources`
pub const SOURCE_NAME: &str = "github";

const ACCEPT_JSON: &str = "application/vnd.github.v3+json";
/// Topics are still served behind the mercy-preview media type
const ACCEPT_TOPICS: &str = "application/vnd.github.mercy-preview+json";

/// One repository record from the list endpoint.
///
/// Upstream records carry far more fields; only the ones folded into the
/// profile are deserialized, all tolerant of absence.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    #[serde(default)]
    pub fork: bool,

    #[serde(default)]
    pub watchers: u64,

    #[serde(default)]
    pub language: Option<String>,

    /// Self-referencing API URL; the topics endpoint hangs off it
    #[serde(default)]
    pub url: String,

    /// Attached by enrichment, not present in the list response
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TopicsResponse {
    #[serde(default)]
    names: Vec<String>,
}

/// Paginated source for one organization's public repositories
pub struct GitHubSource {
    base_url: String,
    org: String,
    token: Option<String>,
}

impl GitHubSource {
    pub fn new(config: &ServiceConfig, org: impl Into<String>) -> Self {
        Self {
            base_url: config.github_api_url.trim_end_matches('/').to_string(),
            org: org.into(),
            token: config.github_token.clone(),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl PageSource for GitHubSource {
    type Item = GitHubRepo;

    fn routine(&self) -> String {
        format!("github repos for {}", self.org)
    }

    fn page_request(&self, client: &Client, page: u32) -> RequestBuilder {
        let url = format!("{}/orgs/{}/repos", self.base_url, self.org);
        self.authorize(
            client
                .get(url)
                .header(header::ACCEPT, ACCEPT_JSON)
                .query(&[("type", "public")])
                .query(&[("page", page)]),
        )
    }

    fn parse_page(&self, body: &str) -> Result<Vec<GitHubRepo>> {
        Ok(serde_json::from_str(body)?)
    }

    async fn enrich(&self, client: &Client, items: &mut [GitHubRepo]) -> Result<()> {
        enrich_each(
            items,
            |repo| {
                let client = client.clone();
                let token = self.token.clone();
                let url = if repo.url.is_empty() {
                    None
                } else {
                    Some(format!("{}/topics", repo.url))
                };
                async move {
                    let Some(url) = url else {
                        return Ok(Vec::new());
                    };

                    let mut request = client.get(&url).header(header::ACCEPT, ACCEPT_TOPICS);
                    if let Some(token) = &token {
                        request = request.bearer_auth(token);
                    }

                    let response = request.send().await?;
                    let response =
                        expect_success(response, format!("github topics pull: {}", url)).await?;

                    let topics: TopicsResponse = response.json().await?;
                    Ok(topics.names)
                }
            },
            |repo, names| repo.topics = names,
        )
        .await
    }
}

/// Fold GitHub repositories into the summary.
///
/// Every repository increments the github source counter and exactly one of
/// the original/forked counters.
pub fn fold_into(repos: &[GitHubRepo], summary: &mut ProfileSummary) {
    for repo in repos {
        if repo.fork {
            summary.repos.forked += 1;
        } else {
            summary.repos.original += 1;
        }

        summary.watchers += repo.watchers;

        if let Some(language) = repo.language.as_deref().filter(|l| !l.is_empty()) {
            *summary.languages.entry(language.to_lowercase()).or_default() += 1;
        }

        for topic in &repo.topics {
            *summary.topics.entry(topic.clone()).or_default() += 1;
        }

        *summary.sources.entry(SOURCE_NAME.to_string()).or_default() += 1;
    }
}
