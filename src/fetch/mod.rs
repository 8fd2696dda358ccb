//! Loading the CSV source from a local path or over HTTP.
//!
//! A failed load is terminal: it surfaces as
//! [`AggregatorError::SourceUnavailable`] and is never retried.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use tracing::{debug, info};

use crate::error::AggregatorError;

/// Fetches `url` and returns the body as text.
pub async fn fetch_text<C: HttpClient>(client: &C, url: &str) -> Result<String, AggregatorError> {
    let parsed = url
        .parse::<reqwest::Url>()
        .map_err(|e| AggregatorError::unavailable(url, format!("invalid URL: {e}")))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client
        .execute(req)
        .await
        .map_err(|e| AggregatorError::unavailable(url, e))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(AggregatorError::unavailable(url, format!("HTTP {status}")));
    }

    resp.text()
        .await
        .map_err(|e| AggregatorError::unavailable(url, e))
}

/// Loads the dataset from an `http(s)://` URL or a local file path.
#[tracing::instrument(fields(source = %location))]
pub async fn load_source(location: &str) -> Result<String, AggregatorError> {
    let text = if location.starts_with("http://") || location.starts_with("https://") {
        let client = BasicClient::new().map_err(|e| AggregatorError::unavailable(location, e))?;
        fetch_text(&client, location).await?
    } else {
        tokio::fs::read_to_string(location)
            .await
            .map_err(|e| AggregatorError::unavailable(location, e))?
    };

    debug!(bytes = text.len(), "Source loaded");
    info!("Dataset loaded");
    Ok(text)
}
