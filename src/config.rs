use std::path::PathBuf;

use crate::errors::AppError;

pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the auth/database service, e.g. `https://xyz.supabase.co`.
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Last.fm API key. Optional at startup; its absence is reported when a
    /// fetch is attempted, not here.
    pub lastfm_api_key: Option<String>,
    /// Where the sign-up confirmation email should send the user.
    pub email_redirect_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            supabase_url: require_env("SUPABASE_URL")?,
            supabase_anon_key: require_env("SUPABASE_ANON_KEY")?,
            lastfm_api_key: optional_env("LASTFM_API_KEY"),
            email_redirect_url: optional_env("EMAIL_REDIRECT_URL"),
        })
    }
}

fn require_env(name: &str) -> Result<String, AppError> {
    optional_env(name)
        .ok_or_else(|| AppError::Config(format!("{} environment variable is required", name)))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("moodify")
}

pub fn session_file_path() -> PathBuf {
    config_dir().join(SESSION_FILE)
}
