use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use quill_types::api::{CreateAccountRequest, DELETE_CONFIRMATION, UpdateAccountRequest};

use crate::auth::{AppState, BasicCredentials, authorize, with_db};
use crate::error::ApiError;

pub async fn list_accounts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let accounts = with_db(&state, |db| Ok(db.list_accounts()?)).await?;
    Ok(Json(accounts))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let account = with_db(&state, move |db| {
        db.get_account(account_id)?
            .ok_or(ApiError::NotFound("Account ID not found"))
    })
    .await?;
    Ok(Json(account))
}

pub async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.ok_or(ApiError::MissingField("username required"))?;
    let password = req.password.ok_or(ApiError::MissingField("password required"))?;

    let account = with_db(&state, move |db| Ok(db.create_account(&username, &password)?)).await?;
    info!(account_id = account.id, username = %account.username, "account created");

    Ok((StatusCode::CREATED, Json(account)))
}

/// Change the password. Only the account itself may do this.
pub async fn update_account(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
    creds: BasicCredentials,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let password = req
        .password
        .ok_or(ApiError::MissingField("new password must be provided"))?;

    let account = with_db(&state, move |db| {
        if db.get_account(account_id)?.is_none() {
            return Err(ApiError::NotFound("Account id not found"));
        }
        let acting = creds.authenticate(db)?;
        authorize(&acting, account_id)?;
        Ok(db.update_password(account_id, &password)?)
    })
    .await?;

    Ok(Json(account))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
    creds: BasicCredentials,
) -> Result<impl IntoResponse, ApiError> {
    with_db(&state, move |db| {
        let acting = creds.authenticate(db)?;
        authorize(&acting, account_id)?;
        Ok(db.delete_account(account_id)?)
    })
    .await?;
    info!(account_id, "account deleted");

    Ok(Json(DELETE_CONFIRMATION))
}

/// Check Basic credentials without touching anything. Clients call this once
/// at startup so a wrong password is reported before any write.
pub async fn login(
    State(state): State<AppState>,
    creds: BasicCredentials,
) -> Result<impl IntoResponse, ApiError> {
    let account = with_db(&state, move |db| creds.authenticate(db)).await?;
    info!(account_id = account.id, "API login");
    Ok(Json(account))
}
