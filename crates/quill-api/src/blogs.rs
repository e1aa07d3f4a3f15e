use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use quill_types::api::{CreateBlogRequest, DELETE_CONFIRMATION, UpdateBlogRequest};

use crate::auth::{AppState, BasicCredentials, authorize, with_db};
use crate::error::ApiError;

pub async fn list_blogs(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let blogs = with_db(&state, |db| Ok(db.list_all_blogs()?)).await?;
    Ok(Json(blogs))
}

pub async fn get_blog(
    State(state): State<AppState>,
    Path(blog_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let blog = with_db(&state, move |db| {
        db.get_blog(blog_id)?.ok_or(ApiError::NotFound("blog not found"))
    })
    .await?;
    Ok(Json(blog))
}

pub async fn create_blog(
    State(state): State<AppState>,
    creds: BasicCredentials,
    Json(req): Json<CreateBlogRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = req.title.ok_or(ApiError::MissingField("blog title required"))?;
    let content = req.content.ok_or(ApiError::MissingField("blog content required"))?;
    let author_id = req.author_id.ok_or(ApiError::MissingField("author id required"))?;

    let blog = with_db(&state, move |db| {
        let acting = creds.authenticate(db)?;
        authorize(&acting, author_id)?;
        Ok(db.create_blog(&title, &content, author_id)?)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(blog)))
}

/// Update title and/or content; at least one must be present.
pub async fn update_blog(
    State(state): State<AppState>,
    Path(blog_id): Path<i64>,
    creds: BasicCredentials,
    Json(req): Json<UpdateBlogRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.is_none() && req.content.is_none() {
        return Err(ApiError::MissingField(
            "At least new title or content must be provided",
        ));
    }

    let blog = with_db(&state, move |db| {
        let existing = db
            .get_blog(blog_id)?
            .ok_or(ApiError::NotFound("Blog id not found"))?;
        let acting = creds.authenticate(db)?;
        authorize(&acting, existing.blog.author_id)?;
        Ok(db.update_blog(blog_id, req.title.as_deref(), req.content.as_deref())?)
    })
    .await?;

    Ok(Json(blog))
}

/// Deleting a blog that is already gone still succeeds.
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(blog_id): Path<i64>,
    creds: BasicCredentials,
) -> Result<impl IntoResponse, ApiError> {
    with_db(&state, move |db| {
        let acting = creds.authenticate(db)?;
        if let Some(existing) = db.get_blog(blog_id)? {
            authorize(&acting, existing.blog.author_id)?;
        }
        Ok(db.delete_blog(blog_id)?)
    })
    .await?;

    Ok(Json(DELETE_CONFIRMATION))
}
