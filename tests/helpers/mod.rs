#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use moodify::backend::{AuthBackend, Filter, Order, Session, SignUpData, SignUpUser};
use moodify::errors::AppError;
use moodify::models::Track;
use moodify::providers::TrackSource;

/// In-memory stand-in for the auth/database service. Holds one table of
/// JSON rows with store-assigned integer ids and honors eq-filters,
/// ordering, and limits the way the real table endpoint does.
pub struct MockBackend {
    pub sign_in_calls: AtomicUsize,
    pub sign_up_calls: AtomicUsize,
    pub sign_in_error: Option<String>,
    /// `sign_up` answers with a user carrying no identities.
    pub signed_up_existing: bool,
    pub session: Mutex<Option<Session>>,
    rows: Mutex<Vec<Value>>,
    next_id: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            sign_in_calls: AtomicUsize::new(0),
            sign_up_calls: AtomicUsize::new(0),
            sign_in_error: None,
            signed_up_existing: false,
            session: Mutex::new(None),
            rows: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
        }
    }

    pub fn with_session(user_id: &str) -> Self {
        let backend = Self::new();
        *backend.session.lock().unwrap() = Some(Session {
            user_id: user_id.to_string(),
            email: Some(format!("{}@example.com", user_id)),
            display_name: None,
        });
        backend
    }

    pub fn with_sign_in_error(message: &str) -> Self {
        let mut backend = Self::new();
        backend.sign_in_error = Some(message.to_string());
        backend
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl AuthBackend for MockBackend {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<Session, AppError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.sign_in_error {
            return Err(AppError::Auth(message.clone()));
        }
        let session = Session {
            user_id: "user-1".to_string(),
            email: Some(email.to_string()),
            display_name: None,
        };
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(session)
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _metadata: Value,
        _redirect_to: Option<&str>,
    ) -> Result<SignUpData, AppError> {
        self.sign_up_calls.fetch_add(1, Ordering::SeqCst);
        let identities = if self.signed_up_existing {
            Vec::new()
        } else {
            vec![json!({ "provider": "email" })]
        };
        Ok(SignUpData {
            user: Some(SignUpUser {
                id: "user-1".to_string(),
                identities,
            }),
        })
    }

    async fn current_user(&self) -> Result<Option<Session>, AppError> {
        Ok(self.session.lock().unwrap().clone())
    }

    async fn select(
        &self,
        _table: &str,
        filters: &[Filter],
        order: Option<Order>,
        limit: Option<u32>,
    ) -> Result<Vec<Value>, AppError> {
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<Value> = rows
            .iter()
            .filter(|row| {
                filters.iter().all(|f| {
                    row.get(&f.column)
                        .map(|v| match v {
                            Value::String(s) => s == &f.value,
                            other => other.to_string() == f.value,
                        })
                        .unwrap_or(false)
                })
            })
            .cloned()
            .collect();

        if let Some(order) = order {
            matched.sort_by_key(|row| row.get(&order.column).and_then(Value::as_i64).unwrap_or(0));
            if order.descending {
                matched.reverse();
            }
        }
        if let Some(limit) = limit {
            matched.truncate(limit as usize);
        }
        Ok(matched)
    }

    async fn insert(&self, _table: &str, row: Value) -> Result<(), AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        let mut row = row;
        if let Value::Object(map) = &mut row {
            map.insert("id".to_string(), json!(id));
        }
        self.rows.lock().unwrap().push(row);
        Ok(())
    }
}

/// Track source returning canned data, or a canned shape failure. Remembers
/// the last tag or query it was asked for.
pub struct MockSource {
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<String>>,
    tracks: Vec<Track>,
    fail_shape: bool,
}

impl MockSource {
    pub fn with_tracks(count: usize) -> Self {
        let tracks = (0..count)
            .map(|i| Track {
                name: format!("Track {}", i),
                artist: format!("Artist {}", i),
                url: format!("https://www.last.fm/music/artist-{0}/_/track-{0}", i),
            })
            .collect();
        Self {
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            tracks,
            fail_shape: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            tracks: Vec::new(),
            fail_shape: true,
        }
    }

    fn respond(&self, request: &str, limit: u32) -> Result<Vec<Track>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.to_string());
        if self.fail_shape {
            return Err(AppError::Shape(
                "missing tracks.track list in tag response".to_string(),
            ));
        }
        Ok(self.tracks.iter().take(limit as usize).cloned().collect())
    }
}

#[async_trait]
impl TrackSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    async fn top_tracks_by_tag(&self, tag: &str, limit: u32) -> Result<Vec<Track>, AppError> {
        self.respond(tag, limit)
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, AppError> {
        self.respond(query, limit)
    }
}

pub fn track(name: &str, artist: &str) -> Track {
    Track {
        name: name.to_string(),
        artist: artist.to_string(),
        url: format!("https://www.last.fm/music/{}/_/{}", artist, name),
    }
}
