use std::sync::Arc;

use crate::backend::{AuthBackend, Session, SupabaseBackend};
use crate::config::{self, AppConfig};
use crate::discovery::{Discovery, SharedViewState, ViewState};
use crate::errors::AppError;
use crate::forms::{self, FieldErrors};
use crate::history::models::RecordedPlay;
use crate::history::RecentTracksManager;
use crate::models::Track;
use crate::providers::lastfm::LastfmClient;
use crate::providers::TrackSource;
use crate::session::{SessionStore, StoredSession};

/// Navigable views. The CLI prints these as prompts instead of routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Main,
    History,
}

/// The history view: either its rows, or a signal that the user must sign
/// in first.
pub enum HistoryView {
    SignedOut,
    Loaded {
        session: Session,
        plays: Vec<RecordedPlay>,
    },
}

pub struct App {
    config: AppConfig,
    backend: Arc<SupabaseBackend>,
    sessions: SessionStore,
    recent: Arc<RecentTracksManager>,
    discovery: Discovery,
}

impl App {
    /// Build the full client from environment configuration, restoring any
    /// persisted session into the gateway.
    pub fn from_env() -> Result<Self, AppError> {
        let config = AppConfig::from_env()?;
        let backend = Arc::new(SupabaseBackend::new(
            config.supabase_url.as_str(),
            config.supabase_anon_key.as_str(),
        )?);

        let sessions = SessionStore::new(config::session_file_path());
        if let Some(stored) = sessions.load() {
            backend.set_access_token(Some(stored.access_token));
        }

        let source: Option<Arc<dyn TrackSource>> = match &config.lastfm_api_key {
            Some(key) => Some(Arc::new(LastfmClient::new(key.clone())?)),
            None => None,
        };

        let auth: Arc<dyn AuthBackend> = backend.clone();
        let recent = Arc::new(RecentTracksManager::new(auth.clone()));
        let discovery = Discovery::new(source, auth, recent.clone(), ViewState::shared());

        Ok(Self {
            config,
            backend,
            sessions,
            recent,
            discovery,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(Session, Route), FieldErrors> {
        let session = forms::submit_login(self.backend.as_ref(), email, password).await?;

        if let Some(token) = self.backend.access_token() {
            let stored = StoredSession::new(token, &session);
            if let Err(e) = self.sessions.save(&stored) {
                log::warn!("Could not persist session: {}", e);
            }
        }

        Ok((session, Route::Main))
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(String, Route), FieldErrors> {
        let message = forms::submit_register(
            self.backend.as_ref(),
            username,
            email,
            password,
            self.config.email_redirect_url.as_deref(),
        )
        .await?;
        Ok((message, Route::Login))
    }

    pub async fn discover(&self, emotion: &str) -> Result<Vec<Track>, AppError> {
        self.discovery.fetch_by_emotion(emotion).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Track>, AppError> {
        self.discovery.search_by_query(query).await
    }

    /// Load the history view. Signals sign-out instead of loading when no
    /// session is active.
    pub async fn history(&self) -> Result<HistoryView, AppError> {
        let session = match self.backend.current_user().await {
            Ok(Some(session)) => session,
            Ok(None) => return Ok(HistoryView::SignedOut),
            Err(e) => {
                log::error!("User lookup failed: {}", e);
                return Ok(HistoryView::SignedOut);
            }
        };

        let plays = self.recent.recent_for_user(&session.user_id).await?;
        Ok(HistoryView::Loaded { session, plays })
    }

    pub fn logout(&self) -> Result<(), AppError> {
        self.backend.set_access_token(None);
        self.sessions.clear()
    }

    pub fn view_state(&self) -> SharedViewState {
        self.discovery.state()
    }
}
