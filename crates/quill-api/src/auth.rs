use std::convert::Infallible;
use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use tracing::{error, info, warn};

use quill_db::Database;
use quill_types::models::Account;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub session_secret: String,
}

/// Run store calls off the async runtime.
pub async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.to_string())
        })?
}

/// HTTP Basic credentials, if the request carried any. Extraction never
/// fails so handlers can validate their input before demanding a login.
pub struct BasicCredentials(Option<(String, String)>);

impl<S> FromRequestParts<S> for BasicCredentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let creds = TypedHeader::<Authorization<Basic>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(basic))| {
                (basic.username().to_string(), basic.password().to_string())
            });
        Ok(Self(creds))
    }
}

impl BasicCredentials {
    pub fn authenticate(&self, db: &Database) -> Result<Account, ApiError> {
        let (username, password) = self.0.as_ref().ok_or(ApiError::CredentialsRequired)?;
        authenticate(db, username, password)
    }
}

/// Check a username/password pair against the stored hash. Legacy hashes are
/// rewritten in the current format once they verify.
pub fn authenticate(db: &Database, username: &str, password: &str) -> Result<Account, ApiError> {
    let credential = db.credentials_for(username)?.ok_or_else(|| {
        warn!(username, "authentication with unknown username");
        ApiError::UnknownUsername
    })?;

    if !credential.verify(password) {
        warn!(username, "authentication with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    if credential.needs_upgrade() {
        let account_id = credential.account().id;
        db.update_password(account_id, password)?;
        info!(account_id, "upgraded legacy password hash");
    }

    Ok(credential.into_account())
}

/// The acting account must own the resource.
pub fn authorize(acting: &Account, owner_id: i64) -> Result<(), ApiError> {
    if acting.id == owner_id {
        Ok(())
    } else {
        warn!(acting = acting.id, owner_id, "rejected modification of another account's resource");
        Err(ApiError::Forbidden)
    }
}
