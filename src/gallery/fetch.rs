use std::time::Duration;

use crate::foundation::error::{LeafFallError, LeafFallResult};
use crate::gallery::listing::{ListingEntry, parse_listing};

const USER_AGENT: &str = concat!("leaffall/", env!("CARGO_PKG_VERSION"));

fn client() -> LeafFallResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| LeafFallError::asset(format!("build http client: {e}")))
}

/// One GET of `url`; non-success statuses are errors. No retries.
#[tracing::instrument]
pub fn fetch_bytes(url: &str) -> LeafFallResult<Vec<u8>> {
    let response = client()?
        .get(url)
        .send()
        .map_err(|e| LeafFallError::asset(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(LeafFallError::asset(format!(
            "GET {url} failed with status: {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .map_err(|e| LeafFallError::asset(format!("read body of {url}: {e}")))?;
    tracing::debug!(len = bytes.len(), "fetched");
    Ok(bytes.to_vec())
}

/// Fetch and parse a contents listing.
pub fn fetch_listing(url: &str) -> LeafFallResult<Vec<ListingEntry>> {
    let bytes = fetch_bytes(url)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| LeafFallError::asset(format!("gallery listing is not utf-8: {e}")))?;
    parse_listing(&text)
}
