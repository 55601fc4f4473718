use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::Track;

/// A source of track metadata.
#[async_trait]
pub trait TrackSource: Send + Sync {
    /// Unique identifier (e.g. "lastfm")
    fn id(&self) -> &str;

    /// The most popular tracks carrying the given tag.
    async fn top_tracks_by_tag(&self, tag: &str, limit: u32) -> Result<Vec<Track>, AppError>;

    /// Free-text track search.
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, AppError>;
}
