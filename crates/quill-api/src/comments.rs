use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use quill_types::api::{CreateCommentRequest, DELETE_CONFIRMATION, UpdateCommentRequest};

use crate::auth::{AppState, BasicCredentials, authorize, with_db};
use crate::error::ApiError;

pub async fn list_comments(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let comments = with_db(&state, |db| Ok(db.list_all_comments()?)).await?;
    Ok(Json(comments))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = with_db(&state, move |db| {
        db.get_comment(comment_id)?
            .ok_or(ApiError::NotFound("Comment ID not found"))
    })
    .await?;
    Ok(Json(comment))
}

pub async fn create_comment(
    State(state): State<AppState>,
    creds: BasicCredentials,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let author_id = req.author_id.ok_or(ApiError::MissingField("author_id required"))?;
    let blog_id = req.blog_id.ok_or(ApiError::MissingField("blog_id required"))?;
    let content = req.content.ok_or(ApiError::MissingField("content required"))?;

    let comment = with_db(&state, move |db| {
        let acting = creds.authenticate(db)?;
        authorize(&acting, author_id)?;
        Ok(db.create_comment(blog_id, author_id, &content)?)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    creds: BasicCredentials,
    Json(req): Json<UpdateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = req
        .content
        .ok_or(ApiError::MissingField("Content must be provided"))?;

    let comment = with_db(&state, move |db| {
        let existing = db
            .get_comment(comment_id)?
            .ok_or(ApiError::NotFound("Comment not found"))?;
        let acting = creds.authenticate(db)?;
        authorize(&acting, existing.comment.author_id)?;
        Ok(db.update_comment(comment_id, Some(&content))?)
    })
    .await?;

    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    creds: BasicCredentials,
) -> Result<impl IntoResponse, ApiError> {
    with_db(&state, move |db| {
        let acting = creds.authenticate(db)?;
        if let Some(existing) = db.get_comment(comment_id)? {
            authorize(&acting, existing.comment.author_id)?;
        }
        Ok(db.delete_comment(comment_id)?)
    })
    .await?;

    Ok(Json(DELETE_CONFIRMATION))
}
