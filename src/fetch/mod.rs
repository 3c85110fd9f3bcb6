//! Paginated upstream fetching
//!
//! Generic machinery for walking a paginated API and fanning out per-item
//! secondary requests: [`PageSource`] describes one upstream list endpoint,
//! [`fetch_all_pages`] walks its pages in order, and [`enrich_each`] runs
//! the enrichment requests for one page concurrently.

mod enrich;
mod pagination;

pub use enrich::enrich_each;
pub use pagination::{expect_success, fetch_all_pages, PageSource};
