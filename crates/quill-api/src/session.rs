use axum::{extract::FromRequestParts, http::request::Parts, response::Redirect};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use quill_types::api::Claims;
use quill_types::models::Account;

use crate::auth::{AppState, with_db};
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "quill_session";

const SESSION_DAYS: i64 = 30;

/// The account logged in through the browser session cookie. Pages that take
/// this extractor redirect to `/login` when there is no valid session or the
/// account no longer exists.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let claims = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| read_token(&state.session_secret, cookie.value()))
            .ok_or_else(|| Redirect::to("/login"))?;

        // The account may have been deleted since the cookie was issued.
        let account_id = claims.sub;
        let account = with_db(state, move |db| Ok(db.get_account(account_id)?))
            .await
            .ok()
            .flatten()
            .ok_or_else(|| Redirect::to("/login"))?;

        Ok(SessionUser {
            id: account.id,
            username: account.username,
        })
    }
}

pub fn issue_token(secret: &str, account: &Account) -> Result<String, ApiError> {
    let claims = Claims {
        sub: account.id,
        username: account.username.clone(),
        exp: (chrono::Utc::now() + chrono::Duration::days(SESSION_DAYS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.to_string()))
}

pub fn read_token(secret: &str, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

pub fn login_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn logout_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_with_same_secret() {
        let account = Account { id: 4, username: "htran20".into() };
        let token = issue_token("secret-a", &account).unwrap();

        let claims = read_token("secret-a", &token).expect("valid token");
        assert_eq!(claims.sub, 4);
        assert_eq!(claims.username, "htran20");

        assert!(read_token("secret-b", &token).is_none());
        assert!(read_token("secret-a", "not-a-jwt").is_none());
    }
}
