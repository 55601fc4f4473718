use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::traits::TrackSource;
use crate::errors::AppError;
use crate::models::Track;

const API_BASE: &str = "https://ws.audioscrobbler.com/2.0/";
const REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// Client for the Last.fm tag API. The API nests JSON awkwardly and omits
/// fields on sparse entries, so every lookup is defensive.
pub struct LastfmClient {
    http: Client,
    api_key: String,
}

impl LastfmClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .user_agent(concat!("moodify/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
        })
    }

    async fn call(&self, params: &[(&str, &str)]) -> Result<Value, AppError> {
        let resp = self.http.get(API_BASE).query(params).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Network(format!(
                "Last.fm request failed with status {}",
                status
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| AppError::Shape(format!("Last.fm response was not JSON: {}", e)))?;

        // API errors can come back with HTTP 200 and an error envelope.
        if body.get("error").is_some() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(AppError::Network(format!("Last.fm API error: {}", message)));
        }

        Ok(body)
    }
}

#[async_trait]
impl TrackSource for LastfmClient {
    fn id(&self) -> &str {
        "lastfm"
    }

    async fn top_tracks_by_tag(&self, tag: &str, limit: u32) -> Result<Vec<Track>, AppError> {
        let limit = limit.to_string();
        let body = self
            .call(&[
                ("method", "tag.gettoptracks"),
                ("tag", tag),
                ("api_key", &self.api_key),
                ("format", "json"),
                ("limit", &limit),
            ])
            .await?;
        parse_top_tracks(&body)
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, AppError> {
        let limit = limit.to_string();
        let body = self
            .call(&[
                ("method", "track.search"),
                ("track", query),
                ("api_key", &self.api_key),
                ("format", "json"),
                ("limit", &limit),
            ])
            .await?;
        parse_search_results(&body)
    }
}

/// `tag.gettoptracks` nests the list under `tracks.track`; its absence is a
/// shape mismatch, not an empty result.
pub fn parse_top_tracks(body: &Value) -> Result<Vec<Track>, AppError> {
    let entries = body
        .get("tracks")
        .and_then(|t| t.get("track"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AppError::Shape("missing tracks.track list in tag response".to_string())
        })?;
    Ok(normalize(entries, parse_tag_entry))
}

/// `track.search` nests under `results.trackmatches.track`, and the artist
/// is a plain string there rather than an object.
pub fn parse_search_results(body: &Value) -> Result<Vec<Track>, AppError> {
    let entries = body
        .get("results")
        .and_then(|r| r.get("trackmatches"))
        .and_then(|m| m.get("track"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AppError::Shape("missing results.trackmatches.track list in search response".to_string())
        })?;
    Ok(normalize(entries, parse_search_entry))
}

fn normalize(entries: &[Value], parse: fn(&Value) -> Option<Track>) -> Vec<Track> {
    entries
        .iter()
        .filter_map(|entry| {
            let track = parse(entry);
            if track.is_none() {
                log::warn!("Skipping malformed track entry");
            }
            track
        })
        .collect()
}

fn parse_tag_entry(entry: &Value) -> Option<Track> {
    Some(Track {
        name: entry.get("name")?.as_str()?.to_string(),
        artist: entry.get("artist")?.get("name")?.as_str()?.to_string(),
        url: entry.get("url")?.as_str()?.to_string(),
    })
}

fn parse_search_entry(entry: &Value) -> Option<Track> {
    Some(Track {
        name: entry.get("name")?.as_str()?.to_string(),
        artist: entry.get("artist")?.as_str()?.to_string(),
        url: entry.get("url")?.as_str()?.to_string(),
    })
}
