use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use super::models::{Filter, Order, Session, SignUpData, SignUpUser};
use super::traits::AuthBackend;
use crate::errors::AppError;

const REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// REST client for a Supabase-style auth/database service. Auth endpoints
/// live under `/auth/v1/`, table access under `/rest/v1/`.
pub struct SupabaseBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: Mutex<Option<String>>,
}

impl SupabaseBackend {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .user_agent(concat!("moodify/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            access_token: Mutex::new(None),
        })
    }

    /// Restore a previously issued access token (e.g. from the session
    /// file), or drop the current one with `None`.
    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.lock() = token;
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token.lock().clone()
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Table calls authenticate as the signed-in user when possible, so the
    /// store can scope rows; otherwise the anon key stands in.
    fn bearer(&self) -> String {
        self.access_token
            .lock()
            .clone()
            .unwrap_or_else(|| self.anon_key.clone())
    }
}

#[async_trait]
impl AuthBackend for SupabaseBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let resp = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .map_err(|e| AppError::Shape(format!("sign-in response was not JSON: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::Auth(error_message(status, &body)));
        }

        let token = body
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::Shape("sign-in response missing access_token".to_string()))?;
        let session = body
            .get("user")
            .and_then(session_from_user)
            .ok_or_else(|| AppError::Shape("sign-in response missing user".to_string()))?;

        self.set_access_token(Some(token.to_string()));
        log::info!("Signed in as {}", session.display_label());
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Value,
        redirect_to: Option<&str>,
    ) -> Result<SignUpData, AppError> {
        let mut request = self
            .client
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password, "data": metadata }));
        if let Some(redirect) = redirect_to {
            request = request.query(&[("redirect_to", redirect)]);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .map_err(|e| AppError::Shape(format!("sign-up response was not JSON: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::Auth(error_message(status, &body)));
        }

        Ok(SignUpData {
            user: parse_signup_user(&body),
        })
    }

    async fn current_user(&self) -> Result<Option<Session>, AppError> {
        let Some(token) = self.access_token() else {
            return Ok(None);
        };

        let resp = self
            .client
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&token)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            // Expired or revoked token; the service owns session lifetime.
            self.set_access_token(None);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AppError::Auth(format!(
                "user lookup failed with status {}",
                status
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| AppError::Shape(format!("user response was not JSON: {}", e)))?;
        Ok(session_from_user(&body))
    }

    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<Order>,
        limit: Option<u32>,
    ) -> Result<Vec<Value>, AppError> {
        let mut params: Vec<(String, String)> = vec![("select".to_string(), "*".to_string())];
        for filter in filters {
            params.push((filter.column.clone(), format!("eq.{}", filter.value)));
        }
        if let Some(order) = order {
            let direction = if order.descending { "desc" } else { "asc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        let resp = self
            .client
            .get(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .query(&params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body: Value = resp.json().await.unwrap_or_default();
            return Err(AppError::Store(error_message(status, &body)));
        }

        resp.json()
            .await
            .map_err(|e| AppError::Shape(format!("{} rows were not a JSON array: {}", table, e)))
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), AppError> {
        let resp = self
            .client
            .post(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(self.bearer())
            .json(&row)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body: Value = resp.json().await.unwrap_or_default();
            return Err(AppError::Store(error_message(status, &body)));
        }
        Ok(())
    }
}

/// Pull a human-readable message out of an error body. The service is not
/// consistent about the field name across endpoints.
fn error_message(status: StatusCode, body: &Value) -> String {
    for key in ["error_description", "msg", "message", "error"] {
        if let Some(msg) = body.get(key).and_then(Value::as_str) {
            return msg.to_string();
        }
    }
    format!("request failed with status {}", status)
}

/// Sign-up responses carry the user either at the top level or under a
/// `user` key, depending on whether a session was issued alongside.
fn parse_signup_user(body: &Value) -> Option<SignUpUser> {
    let user = body
        .get("user")
        .filter(|u| u.is_object())
        .or_else(|| body.get("id").is_some().then_some(body))?;

    let id = user.get("id")?.as_str()?.to_string();
    let identities = user
        .get("identities")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    Some(SignUpUser { id, identities })
}

fn session_from_user(user: &Value) -> Option<Session> {
    let user_id = user.get("id")?.as_str()?.to_string();
    let email = user.get("email").and_then(Value::as_str).map(str::to_string);
    let display_name = user
        .get("user_metadata")
        .and_then(|m| m.get("username"))
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(Session {
        user_id,
        email,
        display_name,
    })
}
