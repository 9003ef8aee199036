//! Track resolution backend contract

use async_trait::async_trait;

use crate::error::ResolveError;
use super::types::Track;

/// Turns user keywords into tracks. Stateless from the controller's point of
/// view, so it is shared between sessions without locking.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Resolve a direct locator (URL, provider id) or a free-text search,
    /// in which case the top match is returned. `Ok(None)` is "not found".
    async fn resolve(&self, keyword: &str) -> Result<Option<Track>, ResolveError>;

    /// A track to continue with after `previous` when autoplay is on and the
    /// queue ran dry
    async fn continuation(&self, previous: &Track) -> Result<Option<Track>, ResolveError>;
}

/// Whether a keyword is a direct locator rather than a search term
pub fn is_locator(keyword: &str) -> bool {
    let keyword = keyword.trim();
    keyword.starts_with("https://") || keyword.starts_with("http://")
}
