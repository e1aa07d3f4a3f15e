use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;

use crate::auth::{self, AppState, with_db};
use crate::error::ApiError;
use crate::html;
use crate::session::{self, SessionUser};

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsForm {
    fn into_pair(self) -> Result<(String, String), ApiError> {
        match (self.username, self.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Ok((u, p)),
            _ => Err(ApiError::MissingField("Username and password must be provided")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewBlogForm {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewCommentForm {
    pub content: Option<String>,
}

pub async fn signup_form() -> Html<String> {
    Html(html::signup_page(None))
}

pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, ApiError> {
    let (username, password) = form.into_pair()?;

    match with_db(&state, move |db| Ok(db.create_account(&username, &password)?)).await {
        Ok(account) => {
            info!(account_id = account.id, "account created from signup page");
            Ok(Html(html::login_page(Some("Account created. Please log in."))).into_response())
        }
        Err(ApiError::DuplicateUsername) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(html::signup_page(Some("Username already exists"))),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

pub async fn login_form() -> Html<String> {
    Html(html::login_page(None))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, ApiError> {
    let (username, password) = form.into_pair()?;

    let account = match with_db(&state, move |db| auth::authenticate(db, &username, &password)).await {
        Ok(account) => account,
        Err(e @ (ApiError::UnknownUsername | ApiError::InvalidCredentials)) => {
            return Ok((e.status(), Html(html::login_page(Some(&e.to_string())))).into_response());
        }
        Err(e) => return Err(e),
    };

    let token = session::issue_token(&state.session_secret, &account)?;
    info!(account_id = account.id, "browser login");

    Ok((jar.add(session::login_cookie(token)), Redirect::to("/")).into_response())
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.remove(session::logout_cookie()), Html(html::logout_page()))
}

pub async fn home(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Html<String>, ApiError> {
    let mut blogs = with_db(&state, |db| Ok(db.list_all_blogs()?)).await?;
    blogs.reverse();
    Ok(Html(html::home_page(&user, &blogs)))
}

pub async fn post_blog(
    State(state): State<AppState>,
    user: SessionUser,
    Form(form): Form<NewBlogForm>,
) -> Result<Redirect, ApiError> {
    let title = form.title.ok_or(ApiError::MissingField("Title must be provided"))?;
    let content = form.content.ok_or(ApiError::MissingField("Content must be provided"))?;

    with_db(&state, move |db| Ok(db.create_blog(&title, &content, user.id)?)).await?;
    Ok(Redirect::to("/"))
}

pub async fn show_blog(
    State(state): State<AppState>,
    user: SessionUser,
    Path(blog_id): Path<i64>,
) -> Result<Html<String>, ApiError> {
    let (blog, comments) = with_db(&state, move |db| {
        let blog = db
            .get_blog(blog_id)?
            .ok_or(ApiError::NotFound("Blog ID not found"))?;
        let comments = db.list_comments_for_blog(blog_id)?;
        Ok((blog, comments))
    })
    .await?;

    Ok(Html(html::blog_page(&user, &blog, &comments)))
}

pub async fn post_comment(
    State(state): State<AppState>,
    user: SessionUser,
    Path(blog_id): Path<i64>,
    Form(form): Form<NewCommentForm>,
) -> Result<Redirect, ApiError> {
    let content = form.content.ok_or(ApiError::MissingField("Content must be provided"))?;

    with_db(&state, move |db| {
        if db.get_blog(blog_id)?.is_none() {
            return Err(ApiError::NotFound("Blog ID not found"));
        }
        Ok(db.create_comment(blog_id, user.id, &content)?)
    })
    .await?;

    Ok(Redirect::to(&format!("/blogs/{blog_id}")))
}

pub async fn show_author(
    State(state): State<AppState>,
    user: SessionUser,
    Path(author_id): Path<i64>,
) -> Result<Html<String>, ApiError> {
    let (author, mut blogs, authors) = with_db(&state, move |db| {
        let author = db
            .get_account(author_id)?
            .ok_or(ApiError::NotFound("Author ID not found"))?;
        let blogs = db.list_blogs_by_author(author_id)?;
        let authors = db.list_accounts()?;
        Ok((author, blogs, authors))
    })
    .await?;
    blogs.reverse();

    Ok(Html(html::author_page(&user, &author, &blogs, &authors)))
}
