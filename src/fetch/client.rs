use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport seam for [`fetch_text`](super::fetch_text); lets callers add
/// headers or swap the client in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
