//! The network fetch capability consumed by the strategies.

use async_trait::async_trait;

use crate::Error;
use crate::model::{Request, Response};

/// Performs one network round trip.
///
/// Any HTTP status counts as a completed fetch. Implementations return
/// [`Error::NetworkFailure`] only when no response could be obtained.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, Error>;
}
