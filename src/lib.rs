//! Repoprofile - merged repository profiles across hosting platforms
//!
//! Aggregates public repository metadata for an organization from GitHub and
//! Bitbucket into one normalized summary, served over HTTP. Both platforms
//! paginate their repository lists and hide part of the interesting metadata
//! behind per-repository endpoints, so one profile request fans out into a
//! page walk per source plus one enrichment request per repository.
//!
//! # Architecture
//!
//! - **fetch**: generic paginated fetching and per-item enrichment fan-out
//! - **sources**: GitHub and Bitbucket adapters (requests, parsing, folds)
//! - **profile**: the aggregation orchestrator and normalized summary type
//! - **server**: thin HTTP layer (`/profile`, `/health`)
//! - **config**: service configuration (base URLs, token, guards)

pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod profile;
pub mod server;
pub mod sources;

// Re-exports
pub use error::{ProfileError, Result};
