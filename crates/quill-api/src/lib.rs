pub mod accounts;
pub mod auth;
pub mod blogs;
pub mod comments;
pub mod error;
pub mod html;
pub mod pages;
pub mod session;

use axum::{
    Router,
    routing::{get, post},
};

use crate::auth::AppState;

/// Every route: the JSON API under `/api` and the browser pages at the root.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/login", post(accounts::login))
        .route(
            "/accounts",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route(
            "/accounts/{account_id}",
            get(accounts::get_account)
                .patch(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route("/blogs", get(blogs::list_blogs).post(blogs::create_blog))
        .route(
            "/blogs/{blog_id}",
            get(blogs::get_blog)
                .patch(blogs::update_blog)
                .delete(blogs::delete_blog),
        )
        .route(
            "/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/comments/{comment_id}",
            get(comments::get_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        );

    let pages = Router::new()
        .route("/", get(pages::home).post(pages::post_blog))
        .route("/signup", get(pages::signup_form).post(pages::signup))
        .route("/login", get(pages::login_form).post(pages::login))
        .route("/logout", get(pages::logout))
        .route(
            "/blogs/{blog_id}",
            get(pages::show_blog).post(pages::post_comment),
        )
        .route("/authors/{author_id}", get(pages::show_author));

    Router::new()
        .nest("/api", api)
        .merge(pages)
        .with_state(state)
}
