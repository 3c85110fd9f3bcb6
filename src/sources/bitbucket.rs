//! Bitbucket source adapter
//!
//! Lists a workspace's repositories page by page (records nested under a
//! `values` key) and enriches each repository with its watcher count from
//! the link the record itself advertises.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use crate::config::ServiceConfig;
use crate::fetch::{enrich_each, expect_success, PageSource};
use crate::profile::ProfileSummary;
use crate::Result;

/// Key under which Bitbucket items are counted in `ProfileSummary::sources`
pub const SOURCE_NAME: &str = "bitbucket";

/// One repository record from the list endpoint, absent-key tolerant.
#[derive(Debug, Clone, Deserialize)]
pub struct BitbucketRepo {
    #[serde(default)]
    pub is_private: bool,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub links: BitbucketLinks,

    /// Attached by enrichment from the watchers endpoint's `size` field
    #[serde(default)]
    pub watchers: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BitbucketLinks {
    #[serde(default)]
    pub watchers: Option<BitbucketLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BitbucketLink {
    pub href: String,
}

/// List responses wrap their records under `values`
#[derive(Debug, Deserialize)]
struct RepoPage {
    #[serde(default)]
    values: Vec<BitbucketRepo>,
}

#[derive(Debug, Deserialize)]
struct WatchersResponse {
    #[serde(default)]
    size: u64,
}

/// Paginated source for one workspace's repositories, unauthenticated
pub struct BitbucketSource {
    base_url: String,
    workspace: String,
}

impl BitbucketSource {
    pub fn new(config: &ServiceConfig, workspace: impl Into<String>) -> Self {
        Self {
            base_url: config.bitbucket_api_url.trim_end_matches('/').to_string(),
            workspace: workspace.into(),
        }
    }
}

#[async_trait]
impl PageSource for BitbucketSource {
    type Item = BitbucketRepo;

    fn routine(&self) -> String {
        format!("bitbucket repos for {}", self.workspace)
    }

    fn page_request(&self, client: &Client, page: u32) -> RequestBuilder {
        let url = format!("{}/repositories/{}", self.base_url, self.workspace);
        client.get(url).query(&[("page", page)])
    }

    fn parse_page(&self, body: &str) -> Result<Vec<BitbucketRepo>> {
        let page: RepoPage = serde_json::from_str(body)?;
        Ok(page.values)
    }

    async fn enrich(&self, client: &Client, items: &mut [BitbucketRepo]) -> Result<()> {
        enrich_each(
            items,
            |repo| {
                let client = client.clone();
                let href = repo.links.watchers.as_ref().map(|link| link.href.clone());
                async move {
                    let Some(url) = href else {
                        return Ok(0);
                    };

                    let response = client.get(&url).send().await?;
                    let response =
                        expect_success(response, format!("bitbucket watchers pull: {}", url))
                            .await?;

                    let watchers: WatchersResponse = response.json().await?;
                    Ok(watchers.size)
                }
            },
            |repo, size| repo.watchers = size,
        )
        .await
    }
}

/// Fold Bitbucket repositories into the summary.
///
/// Private repositories are skipped entirely and contribute to no counter.
/// Bitbucket has no fork concept here, so every counted repository is
/// original.
pub fn fold_into(repos: &[BitbucketRepo], summary: &mut ProfileSummary) {
    for repo in repos {
        if repo.is_private {
            continue;
        }

        summary.repos.original += 1;
        summary.watchers += repo.watchers;

        if let Some(language) = repo.language.as_deref().filter(|l| !l.is_empty()) {
            *summary.languages.entry(language.to_lowercase()).or_default() += 1;
        }

        *summary.sources.entry(SOURCE_NAME.to_string()).or_default() += 1;
    }
}
