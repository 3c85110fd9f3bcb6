//! Profile aggregation
//!
//! Drives the two source fetchers concurrently and folds their raw item
//! lists into one normalized summary.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{header, Client};
use serde::Serialize;
use tracing::info;

use crate::config::ServiceConfig;
use crate::fetch::fetch_all_pages;
use crate::sources::{bitbucket, github, BitbucketSource, GitHubSource};
use crate::Result;

/// Original vs forked repository counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoCounts {
    pub original: u64,
    pub forked: u64,
}

/// Normalized profile summary across both sources.
///
/// Constructed fresh (all counters zero, all maps empty) for every
/// aggregation call; never copied from a shared template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub repos: RepoCounts,
    pub watchers: u64,
    pub languages: BTreeMap<String, u64>,
    pub topics: BTreeMap<String, u64>,
    pub sources: BTreeMap<String, u64>,
}

/// Aggregates GitHub and Bitbucket repository metadata for one
/// organization pair. One shared HTTP client backs all fetches.
pub struct ProfileService {
    client: Client,
    config: ServiceConfig,
}

impl ProfileService {
    /// Create a new service.
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::USER_AGENT,
                    header::HeaderValue::from_static("repoprofile/1.0"),
                );
                headers
            })
            .build()?;

        Ok(Self { client, config })
    }

    /// Build the merged profile for the two organization handles.
    ///
    /// Both sources are fetched concurrently. The first failure aborts the
    /// build; no partial summary is ever returned.
    pub async fn build_profile(
        &self,
        github_org: &str,
        bitbucket_org: &str,
    ) -> Result<ProfileSummary> {
        let github = GitHubSource::new(&self.config, github_org);
        let bitbucket = BitbucketSource::new(&self.config, bitbucket_org);

        let (github_repos, bitbucket_repos) = tokio::try_join!(
            fetch_all_pages(&self.client, &github, self.config.max_pages),
            fetch_all_pages(&self.client, &bitbucket, self.config.max_pages),
        )?;

        info!(
            github_org,
            bitbucket_org,
            github_repos = github_repos.len(),
            bitbucket_repos = bitbucket_repos.len(),
            "Aggregation complete"
        );

        let mut summary = ProfileSummary::default();
        github::fold_into(&github_repos, &mut summary);
        bitbucket::fold_into(&bitbucket_repos, &mut summary);

        Ok(summary)
    }
}
