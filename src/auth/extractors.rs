use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use super::{repo_types::User, session::SessionKeys};
use crate::{error::AppError, state::AppState};

/// Request-scoped login state: the user behind the session cookie, if any.
///
/// Only a storage failure rejects; a missing, forged or expired token, or one
/// naming a deleted user, yields `Session(None)`.
pub struct Session(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(cookie) = jar.get(&keys.cookie_name) else {
            return Ok(Session(None));
        };

        let claims = match keys.verify(cookie.value()) {
            Ok(c) => c,
            Err(e) => {
                debug!(error = %e, "discarding invalid session token");
                return Ok(Session(None));
            }
        };

        let user = state.users.find_by_id(claims.sub).await?;
        if user.is_none() {
            warn!(user_id = claims.sub, "session names an unknown user");
        }
        Ok(Session(user))
    }
}

impl Session {
    pub fn username(&self) -> Option<String> {
        self.0.as_ref().map(|u| u.username.clone())
    }
}

/// An authenticated user; rejects with `Unauthenticated` (redirect to login).
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Session(user) = Session::from_request_parts(parts, state).await?;
        user.map(AuthUser).ok_or(AppError::Unauthenticated)
    }
}
