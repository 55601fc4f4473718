use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde_json::json;

use crate::backend::models::Session;
use crate::backend::traits::AuthBackend;
use crate::errors::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_USERNAME_LEN: usize = 2;
pub const PASSWORD_SPECIAL_CHARS: [char; 4] = ['?', '!', '@', '*'];

/// How long the registration confirmation stays on screen before the client
/// moves back to the login view.
pub const REGISTER_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid pattern"))
}

/// Field-scoped messages from validation or a rejected submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Form-level message not tied to a single field.
    pub form: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.form.is_none()
    }

    fn password_message(message: impl Into<String>) -> Self {
        Self {
            password: Some(message.into()),
            ..Default::default()
        }
    }

    fn email_message(message: impl Into<String>) -> Self {
        Self {
            email: Some(message.into()),
            ..Default::default()
        }
    }

    fn form_message(message: impl Into<String>) -> Self {
        Self {
            form: Some(message.into()),
            ..Default::default()
        }
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    if !email_regex().is_match(email) {
        errors.email = Some("Please enter a valid email address.".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.password = Some("Password must be at least 6 characters.".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_register(username: &str, email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    if username.chars().count() < MIN_USERNAME_LEN {
        errors.username = Some("Username must be at least 2 characters.".to_string());
    }
    if !email_regex().is_match(email) {
        errors.email = Some("Please enter a valid email address.".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.password = Some("Password must be at least 6 characters.".to_string());
    } else if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(&c)) {
        errors.password =
            Some("Password must contain a special character (?, !, @, *).".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate and submit the login form. Local validation failures never reach
/// the network; backend failures that match known service messages are
/// mapped onto the offending field.
pub async fn submit_login(
    backend: &dyn AuthBackend,
    email: &str,
    password: &str,
) -> Result<Session, FieldErrors> {
    validate_login(email, password)?;

    match backend.sign_in(email, password).await {
        Ok(session) => Ok(session),
        Err(error) => Err(map_sign_in_error(&error)),
    }
}

fn map_sign_in_error(error: &AppError) -> FieldErrors {
    let message = raw_message(error);
    if message.contains("Invalid login credentials") {
        FieldErrors::password_message("Email or password do not match.")
    } else if message.contains("Email not confirmed") {
        FieldErrors::email_message("Please confirm your email address first.")
    } else {
        FieldErrors::password_message(format!("Login failed: {}", message))
    }
}

/// Validate and submit the registration form. On success the returned
/// message is shown to the user; the caller then waits
/// [`REGISTER_REDIRECT_DELAY`] before switching back to the login view.
pub async fn submit_register(
    backend: &dyn AuthBackend,
    username: &str,
    email: &str,
    password: &str,
    redirect_to: Option<&str>,
) -> Result<String, FieldErrors> {
    validate_register(username, email, password)?;

    let metadata = json!({ "username": username });
    match backend.sign_up(email, password, metadata, redirect_to).await {
        Ok(data) if data.is_existing_user() => Err(FieldErrors::form_message(
            "This account is already registered.",
        )),
        Ok(_) => Ok("Registration complete! Check your email for a confirmation link.".to_string()),
        Err(error) => Err(FieldErrors::form_message(format!(
            "Registration failed: {}",
            raw_message(&error)
        ))),
    }
}

fn raw_message(error: &AppError) -> String {
    match error {
        AppError::Auth(message) => message.clone(),
        other => other.to_string(),
    }
}
