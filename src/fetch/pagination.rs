//! Page-by-page walking of an upstream list endpoint.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

use crate::{ProfileError, Result};

/// One paginated upstream list endpoint.
///
/// Implementations describe how to build the GET request for a page, how to
/// parse a response body into items (descending into a nested key where the
/// upstream wraps its records), and how to enrich one page of items with
/// secondary requests. The page counter is the only thing that varies
/// between requests; everything else stays fixed for the fetch's duration.
#[async_trait]
pub trait PageSource {
    type Item: Send;

    /// Label used in error and log context, e.g. `"github repos for acme"`.
    fn routine(&self) -> String;

    /// Build the GET request for the given page (1-based).
    fn page_request(&self, client: &Client, page: u32) -> RequestBuilder;

    /// Parse one response body into a page of items.
    fn parse_page(&self, body: &str) -> Result<Vec<Self::Item>>;

    /// Run secondary per-item requests for one page, attaching results in
    /// place. Called only for non-empty pages.
    async fn enrich(&self, client: &Client, items: &mut [Self::Item]) -> Result<()>;
}

/// Return the response if its status is 2xx, otherwise consume it into an
/// [`ProfileError::Upstream`] carrying the status code and body text.
pub async fn expect_success(response: Response, routine: impl Into<String>) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProfileError::Upstream {
        routine: routine.into(),
        status: status.as_u16(),
        body,
    })
}

/// Walk all pages of `source` until the upstream returns an empty page.
///
/// Pages are fetched strictly in increasing order, and a page's enrichment
/// completes before the next page is requested. The first empty page is the
/// sole termination condition; no total-count or next-page field is
/// consulted. Any non-2xx reply aborts the walk with
/// [`ProfileError::Upstream`]. The `max_pages` guard bounds the walk
/// against an upstream that never returns an empty page.
pub async fn fetch_all_pages<S>(
    client: &Client,
    source: &S,
    max_pages: u32,
) -> Result<Vec<S::Item>>
where
    S: PageSource + Sync,
{
    let mut all = Vec::new();

    for page in 1.. {
        if page > max_pages {
            return Err(ProfileError::PageLimit {
                routine: source.routine(),
                limit: max_pages,
            });
        }

        let response = source.page_request(client, page).send().await?;
        let response =
            expect_success(response, format!("{} (page {})", source.routine(), page)).await?;

        let body = response.text().await?;
        let mut items = source.parse_page(&body)?;
        if items.is_empty() {
            break;
        }

        source.enrich(client, &mut items).await?;

        debug!(
            routine = %source.routine(),
            page,
            count = items.len(),
            "Fetched page"
        );
        all.extend(items);
    }

    Ok(all)
}
