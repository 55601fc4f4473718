use async_trait::async_trait;
use serde_json::Value;

use super::models::{Filter, Order, Session, SignUpData};
use crate::errors::AppError;

/// Gateway to the external auth/database service.
///
/// Everything the client needs from the managed backend fits in five
/// operations; any conforming implementation (the REST client, an in-memory
/// stand-in) can substitute.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Authenticate with email and password, establishing a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError>;

    /// Register a new account. `metadata` is attached to the user profile;
    /// `redirect_to` is where the confirmation email should land.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Value,
        redirect_to: Option<&str>,
    ) -> Result<SignUpData, AppError>;

    /// The currently authenticated user, or `None` when signed out or the
    /// session has expired.
    async fn current_user(&self) -> Result<Option<Session>, AppError>;

    /// Rows from `table` matching all `filters`, optionally ordered and
    /// capped.
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<Order>,
        limit: Option<u32>,
    ) -> Result<Vec<Value>, AppError>;

    /// Insert one row into `table`. The store assigns the row id.
    async fn insert(&self, table: &str, row: Value) -> Result<(), AppError>;
}
