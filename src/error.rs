use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::error;

use crate::auth::repo_types::User;
use crate::db::RepoError;
use crate::views::{self, ErrorPage};

/// Failures a request can end in. Every variant short of `Storage`/`Internal`
/// is a normal outcome of user input.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("A patient with this CI already exists")]
    DuplicateIdentity,

    #[error("Not found")]
    NotFound,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] RepoError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::DuplicateUsername | Self::DuplicateIdentity => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    /// Render as a page whose layout reflects `current_user`.
    pub fn into_page(self, current_user: Option<String>) -> Response {
        if let Self::Unauthenticated = self {
            return Redirect::to("/login").into_response();
        }

        let status = self.status();
        let message = match &self {
            Self::Storage(e) => {
                error!(error = %e, "storage failure");
                "Internal server error".to_string()
            }
            Self::Internal(e) => {
                error!(error = %e, "internal failure");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let page = ErrorPage {
            current_user,
            status: status.as_u16(),
            message,
        };
        (status, views::render(&page)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_page(None)
    }
}

/// An `AppError` raised while serving a signed-in user.
pub struct PageError {
    error: AppError,
    current_user: String,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        self.error.into_page(Some(self.current_user))
    }
}

pub trait ForUser<T> {
    fn for_user(self, user: &User) -> Result<T, PageError>;
}

impl<T> ForUser<T> for Result<T, AppError> {
    fn for_user(self, user: &User) -> Result<T, PageError> {
        self.map_err(|error| PageError {
            error,
            current_user: user.username.clone(),
        })
    }
}
