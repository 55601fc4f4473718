use serde::{Deserialize, Serialize};

/// A persisted record linking a user, a track, and the emotion under which
/// it was surfaced. `id` is assigned by the store and orders the history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedPlay {
    pub id: i64,
    pub user_id: String,
    pub track_name: String,
    pub artist_name: String,
    pub url: String,
    pub emotion: String,
}
