use tracing::{info, warn};

use crate::db::RepoError;
use crate::error::AppError;
use crate::patients::{
    repo::PatientRepo,
    repo_types::{Patient, PatientInput},
};

pub async fn list(patients: &dyn PatientRepo) -> Result<Vec<Patient>, AppError> {
    Ok(patients.list_all().await?)
}

pub async fn get(patients: &dyn PatientRepo, id: i64) -> Result<Patient, AppError> {
    patients.find_by_id(id).await?.ok_or(AppError::NotFound)
}

pub async fn create(patients: &dyn PatientRepo, input: PatientInput) -> Result<Patient, AppError> {
    match patients.insert(&input).await {
        Ok(p) => {
            info!(patient_id = p.id, ci = %p.ci, "patient created");
            Ok(p)
        }
        Err(RepoError::UniqueViolation) => {
            warn!(ci = %input.ci, "duplicate ci on create");
            Err(AppError::DuplicateIdentity)
        }
        Err(e) => Err(e.into()),
    }
}

/// Overwrite all fields of patient `id`.
pub async fn update(
    patients: &dyn PatientRepo,
    id: i64,
    input: PatientInput,
) -> Result<Patient, AppError> {
    match patients.update(id, &input).await {
        Ok(Some(p)) => {
            info!(patient_id = p.id, ci = %p.ci, "patient updated");
            Ok(p)
        }
        Ok(None) => Err(AppError::NotFound),
        Err(RepoError::UniqueViolation) => {
            warn!(patient_id = id, ci = %input.ci, "duplicate ci on update");
            Err(AppError::DuplicateIdentity)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete(patients: &dyn PatientRepo, id: i64) -> Result<(), AppError> {
    if !patients.delete(id).await? {
        return Err(AppError::NotFound);
    }
    info!(patient_id = id, "patient deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    fn input(ci: &str) -> PatientInput {
        PatientInput {
            name: "Ana".into(),
            lastname: "Lopez".into(),
            ci: ci.into(),
            birth_date: "1990-01-01".into(),
        }
    }

    #[tokio::test]
    async fn created_patients_are_listed_once() {
        let state = AppState::fake().await;
        let repo = state.patients.as_ref();

        let a = create(repo, input("CI1")).await.unwrap();
        let b = create(repo, input("CI2")).await.unwrap();

        let all = list(repo).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().filter(|p| p.id == a.id).count(), 1);
        assert_eq!(all.iter().filter(|p| p.id == b.id).count(), 1);
    }

    #[tokio::test]
    async fn duplicate_ci_on_create_leaves_list_unchanged() {
        let state = AppState::fake().await;
        let repo = state.patients.as_ref();
        create(repo, input("CI123")).await.unwrap();

        let err = create(repo, input("CI123")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateIdentity));
        assert_eq!(list(repo).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_checks_existence_and_ci_collisions() {
        let state = AppState::fake().await;
        let repo = state.patients.as_ref();
        let a = create(repo, input("CI1")).await.unwrap();
        let b = create(repo, input("CI2")).await.unwrap();

        let err = update(repo, b.id + 100, input("CI9")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));

        let err = update(repo, b.id, input("CI1")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateIdentity));

        let updated = update(repo, a.id, input("CI3")).await.unwrap();
        assert_eq!(updated.ci, "CI3");
        assert_eq!(get(repo, a.id).await.unwrap().ci, "CI3");
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let state = AppState::fake().await;
        let repo = state.patients.as_ref();
        let p = create(repo, input("CI1")).await.unwrap();

        delete(repo, p.id).await.unwrap();
        assert!(list(repo).await.unwrap().iter().all(|x| x.id != p.id));

        let err = delete(repo, p.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
        assert!(matches!(get(repo, p.id).await, Err(AppError::NotFound)));
    }
}
