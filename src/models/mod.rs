use serde::{Deserialize, Serialize};

/// A normalized track as surfaced by a track source.
///
/// Tracks carry no identity of their own; identity only exists once a play
/// is recorded against a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artist: String,
    pub url: String,
}
