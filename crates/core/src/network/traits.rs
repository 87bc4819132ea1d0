use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::http::{Request, Response};

/// Trait abstraction over the network.
///
/// The cache manager never talks to a socket directly; it goes through a
/// `Fetcher`, so the host runtime (or a test) decides what "the network" is.
///
/// A response with any status code, including 4xx/5xx, is `Ok`. `Err` means
/// the request never produced a response (offline, DNS failure, timeout).
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Human-readable name of this fetcher (for logs).
    fn name(&self) -> &str;

    async fn fetch(&self, request: &Request) -> Result<Response, CoreError>;
}
