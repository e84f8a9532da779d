use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::{AppError, ForUser, PageError},
    patients::{
        dto::{parse_id, PatientForm},
        services,
    },
    state::AppState,
    views::{self, CreatePatientPage, DeletePatientPage, PatientListPage, UpdatePatientPage},
};

/// Every route here requires a session; anonymous requests are sent to `/login`.
pub fn patient_routes() -> Router<AppState> {
    Router::new()
        .route("/patients", get(list_patients))
        .route("/patients/create", get(create_form).post(create_patient))
        .route("/patients/:id/update", get(update_form).post(update_patient))
        .route("/patients/:id/delete", get(delete_confirm).post(delete_patient))
}

#[instrument(skip(state, user))]
pub async fn list_patients(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Response, PageError> {
    let patients = services::list(state.patients.as_ref()).await.for_user(&user)?;
    Ok(views::render(&PatientListPage {
        current_user: Some(user.username),
        patients,
    }))
}

#[instrument(skip(user))]
pub async fn create_form(AuthUser(user): AuthUser) -> Response {
    views::render(&CreatePatientPage {
        current_user: Some(user.username),
        form: PatientForm::default(),
        error: None,
    })
}

#[instrument(skip(state, user, form))]
pub async fn create_patient(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Form(form): Form<PatientForm>,
) -> Result<Response, PageError> {
    let result = match form.validate() {
        Ok(input) => services::create(state.patients.as_ref(), input).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => Ok(Redirect::to("/patients").into_response()),
        Err(e @ (AppError::DuplicateIdentity | AppError::Validation(_))) => {
            let page = CreatePatientPage {
                current_user: Some(user.username),
                form,
                error: Some(e.to_string()),
            };
            Ok((e.status(), views::render(&page)).into_response())
        }
        Err(e) => Err::<Response, _>(e).for_user(&user),
    }
}

#[instrument(skip(state, user))]
pub async fn update_form(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Response, PageError> {
    let id = parse_id(&raw_id).for_user(&user)?;
    let patient = services::get(state.patients.as_ref(), id)
        .await
        .for_user(&user)?;
    Ok(views::render(&UpdatePatientPage {
        current_user: Some(user.username),
        id,
        form: patient.into(),
        error: None,
    }))
}

#[instrument(skip(state, user, form))]
pub async fn update_patient(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(raw_id): Path<String>,
    Form(form): Form<PatientForm>,
) -> Result<Response, PageError> {
    let id = parse_id(&raw_id).for_user(&user)?;
    let result = match form.validate() {
        Ok(input) => services::update(state.patients.as_ref(), id, input).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => Ok(Redirect::to("/patients").into_response()),
        Err(e @ (AppError::DuplicateIdentity | AppError::Validation(_))) => {
            let page = UpdatePatientPage {
                current_user: Some(user.username),
                id,
                form,
                error: Some(e.to_string()),
            };
            Ok((e.status(), views::render(&page)).into_response())
        }
        Err(e) => Err::<Response, _>(e).for_user(&user),
    }
}

#[instrument(skip(state, user))]
pub async fn delete_confirm(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Response, PageError> {
    let id = parse_id(&raw_id).for_user(&user)?;
    let patient = services::get(state.patients.as_ref(), id)
        .await
        .for_user(&user)?;
    Ok(views::render(&DeletePatientPage {
        current_user: Some(user.username),
        patient,
    }))
}

#[instrument(skip(state, user))]
pub async fn delete_patient(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Redirect, PageError> {
    let id = parse_id(&raw_id).for_user(&user)?;
    services::delete(state.patients.as_ref(), id)
        .await
        .for_user(&user)?;
    Ok(Redirect::to("/patients"))
}
