use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        extractors::{AuthUser, Session},
        services,
        session::SessionKeys,
    },
    error::AppError,
    state::AppState,
    views::{self, LoginPage, RegisterPage},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
        .route("/users", get(register_form).post(register))
}

#[instrument(skip(session))]
pub async fn login_form(session: Session) -> Response {
    views::render(&LoginPage {
        current_user: session.username(),
        username: String::new(),
        error: None,
    })
}

#[instrument(skip(state, jar, form))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let result = match form.validate() {
        Ok(creds) => services::login(state.users.as_ref(), creds).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(user) => {
            let cookie = SessionKeys::from_ref(&state).cookie(user.id)?;
            Ok((jar.add(cookie), Redirect::to("/patients")).into_response())
        }
        Err(e @ (AppError::InvalidCredentials | AppError::Validation(_))) => {
            let page = LoginPage {
                current_user: None,
                username: form.username.trim().to_string(),
                error: Some(e.to_string()),
            };
            Ok((e.status(), views::render(&page)).into_response())
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let keys = SessionKeys::from_ref(&state);
    info!(user_id = user.id, "user logged out");
    (jar.remove(keys.removal_cookie()), Redirect::to("/login"))
}

#[instrument(skip(session))]
pub async fn register_form(session: Session) -> Response {
    views::render(&RegisterPage {
        current_user: session.username(),
        username: String::new(),
        error: None,
    })
}

#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let result = match form.validate() {
        Ok(reg) => services::register(state.users.as_ref(), reg).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => Ok(Redirect::to("/login").into_response()),
        Err(e @ (AppError::DuplicateUsername | AppError::Validation(_))) => {
            let page = RegisterPage {
                current_user: session.username(),
                username: form.username.trim().to_string(),
                error: Some(e.to_string()),
            };
            Ok((e.status(), views::render(&page)).into_response())
        }
        Err(e) => Err(e),
    }
}
