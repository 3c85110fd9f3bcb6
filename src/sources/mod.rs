//! Upstream source adapters
//!
//! One adapter per hosting platform, covering request shaping, response
//! parsing, per-repository enrichment, and the fold into the normalized
//! profile summary.

pub mod bitbucket;
pub mod github;

// GitHub exports
pub use github::{GitHubRepo, GitHubSource};

// Bitbucket exports
pub use bitbucket::{BitbucketLink, BitbucketLinks, BitbucketRepo, BitbucketSource};
