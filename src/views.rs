//! Server-rendered pages.
//!
//! Every page carries `current_user` so the shared layout can decide which
//! navigation links to show.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::patients::{dto::PatientForm, repo_types::Patient};

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub current_user: Option<String>,
    pub username: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub current_user: Option<String>,
    pub username: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "list_patients.html")]
pub struct PatientListPage {
    pub current_user: Option<String>,
    pub patients: Vec<Patient>,
}

#[derive(Template)]
#[template(path = "create_patient.html")]
pub struct CreatePatientPage {
    pub current_user: Option<String>,
    pub form: PatientForm,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "update_patient.html")]
pub struct UpdatePatientPage {
    pub current_user: Option<String>,
    pub id: i64,
    pub form: PatientForm,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "delete_patient.html")]
pub struct DeletePatientPage {
    pub current_user: Option<String>,
    pub patient: Patient,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub current_user: Option<String>,
    pub status: u16,
    pub message: String,
}

/// Render a template into an HTML response; a template failure becomes a bare 500.
pub fn render<T: Template>(page: &T) -> Response {
    match page.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            error!(error = %e, "template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
