pub mod models;

use std::sync::Arc;

use serde_json::json;

use crate::backend::{AuthBackend, Filter, Order};
use crate::errors::AppError;
use crate::models::Track;
use models::RecordedPlay;

const TABLE: &str = "recent_tracks";

/// Most recent plays shown on the history view.
pub const HISTORY_LIMIT: u32 = 30;

pub struct RecentTracksManager {
    backend: Arc<dyn AuthBackend>,
}

impl RecentTracksManager {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self { backend }
    }

    /// Record a surfaced track for a user unless an identical play is
    /// already stored, keeping repeat dispatches of the same
    /// (user, track, emotion) down to a single row.
    ///
    /// The existence probe and the insert are separate store calls; the
    /// store offers no atomic insert-if-absent, so two concurrent
    /// dispatches of the same play can still both insert.
    pub async fn record_if_absent(
        &self,
        user_id: &str,
        track: &Track,
        emotion: &str,
    ) -> Result<(), AppError> {
        let filters = [
            Filter::eq("user_id", user_id),
            Filter::eq("track_name", track.name.as_str()),
            Filter::eq("artist_name", track.artist.as_str()),
            Filter::eq("emotion", emotion),
        ];
        let existing = self.backend.select(TABLE, &filters, None, Some(1)).await?;
        if !existing.is_empty() {
            log::debug!(
                "Play already recorded: {} - {} ({})",
                track.artist,
                track.name,
                emotion
            );
            return Ok(());
        }

        self.backend
            .insert(
                TABLE,
                json!({
                    "user_id": user_id,
                    "track_name": track.name,
                    "artist_name": track.artist,
                    "url": track.url,
                    "emotion": emotion,
                }),
            )
            .await
    }

    /// The user's most recent plays, newest first.
    pub async fn recent_for_user(&self, user_id: &str) -> Result<Vec<RecordedPlay>, AppError> {
        let rows = self
            .backend
            .select(
                TABLE,
                &[Filter::eq("user_id", user_id)],
                Some(Order::desc("id")),
                Some(HISTORY_LIMIT),
            )
            .await?;

        let mut plays = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value::<RecordedPlay>(row) {
                Ok(play) => plays.push(play),
                Err(e) => log::warn!("Skipping malformed history row: {}", e),
            }
        }
        Ok(plays)
    }
}
