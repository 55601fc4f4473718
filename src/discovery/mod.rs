use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::AuthBackend;
use crate::errors::AppError;
use crate::history::RecentTracksManager;
use crate::models::Track;
use crate::providers::TrackSource;

/// Emotions offered on the main view. Any other label works too; the API
/// tag is the lowercased label.
pub const EMOTIONS: &[&str] = &["Sad", "Happy", "Angry", "Chill"];

/// Fixed result size for both tag fetches and searches.
pub const RESULT_LIMIT: u32 = 10;

/// Mutable state of the main view: what is displayed, whether a request is
/// in flight, and the latest user-facing alert.
#[derive(Debug, Default)]
pub struct ViewState {
    pub tracks: Vec<Track>,
    pub loading: bool,
    pub alert: Option<String>,
}

impl ViewState {
    pub fn shared() -> SharedViewState {
        Arc::new(Mutex::new(ViewState::default()))
    }
}

pub type SharedViewState = Arc<Mutex<ViewState>>;

/// Issues fetch/search requests against the track source and applies the
/// outcome to the view.
pub struct Discovery {
    source: Option<Arc<dyn TrackSource>>,
    backend: Arc<dyn AuthBackend>,
    recent: Arc<RecentTracksManager>,
    state: SharedViewState,
}

impl Discovery {
    pub fn new(
        source: Option<Arc<dyn TrackSource>>,
        backend: Arc<dyn AuthBackend>,
        recent: Arc<RecentTracksManager>,
        state: SharedViewState,
    ) -> Self {
        Self {
            source,
            backend,
            recent,
            state,
        }
    }

    pub fn state(&self) -> SharedViewState {
        self.state.clone()
    }

    fn source(&self) -> Result<&Arc<dyn TrackSource>, AppError> {
        self.source
            .as_ref()
            .ok_or_else(|| AppError::Config("LASTFM_API_KEY is not configured".to_string()))
    }

    /// Fetch the top tracks for an emotion and update the view. When a user
    /// is signed in, every surfaced track is offered to the recent-plays
    /// recorder; recording is best effort and never blocks the results.
    pub async fn fetch_by_emotion(&self, emotion: &str) -> Result<Vec<Track>, AppError> {
        self.state.lock().loading = true;
        let result = self.fetch_by_emotion_inner(emotion).await;
        self.finish(result, "Something went wrong while fetching tracks.")
    }

    async fn fetch_by_emotion_inner(&self, emotion: &str) -> Result<Vec<Track>, AppError> {
        let source = self.source()?;
        let tag = emotion.to_lowercase();
        let tracks = source.top_tracks_by_tag(&tag, RESULT_LIMIT).await?;
        log::info!("Fetched {} tracks for emotion {}", tracks.len(), emotion);

        match self.backend.current_user().await {
            Ok(Some(session)) => {
                for track in &tracks {
                    if let Err(e) = self
                        .recent
                        .record_if_absent(&session.user_id, track, emotion)
                        .await
                    {
                        log::warn!(
                            "Could not record play {} - {}: {}",
                            track.artist,
                            track.name,
                            e
                        );
                    }
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("Skipping play recording, user lookup failed: {}", e),
        }

        Ok(tracks)
    }

    /// Free-text track search. A blank query is a no-op and touches neither
    /// the network nor the view.
    pub async fn search_by_query(&self, query: &str) -> Result<Vec<Track>, AppError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        self.state.lock().loading = true;
        let result = self.search_inner(query).await;
        self.finish(result, "Something went wrong while searching.")
    }

    async fn search_inner(&self, query: &str) -> Result<Vec<Track>, AppError> {
        let source = self.source()?;
        let tracks = source.search_tracks(query, RESULT_LIMIT).await?;
        log::info!("Search '{}' returned {} tracks", query, tracks.len());
        Ok(tracks)
    }

    /// Clear the loading flag and apply the outcome to the view. Failures
    /// leave previously displayed tracks in place.
    fn finish(
        &self,
        result: Result<Vec<Track>, AppError>,
        alert: &str,
    ) -> Result<Vec<Track>, AppError> {
        let mut state = self.state.lock();
        state.loading = false;
        match &result {
            Ok(tracks) => {
                state.tracks = tracks.clone();
                state.alert = None;
            }
            Err(error) => {
                log::error!("{}", error);
                state.alert = Some(alert.to_string());
            }
        }
        result
    }
}
