use serde::{Deserialize, Serialize};

// -- Session --

/// Claims carried by the browser session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub exp: usize,
}

/// Body of every API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// -- Accounts --
//
// Request fields are optional so the handlers can report exactly which one
// is missing instead of a generic deserialization failure.

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    pub password: Option<String>,
}

// -- Blogs --

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

// -- Comments --

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub blog_id: Option<i64>,
    pub author_id: Option<i64>,
    pub content: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
}

/// Body returned by every successful DELETE.
pub const DELETE_CONFIRMATION: &str = "Delete Successfully";
