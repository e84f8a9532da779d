use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::RepoError;
use crate::patients::repo_types::{Patient, PatientInput};

/// Persistence for patient records. Each call is a single statement.
#[async_trait]
pub trait PatientRepo: Send + Sync {
    /// All patients in insertion order.
    async fn list_all(&self) -> Result<Vec<Patient>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>, RepoError>;

    /// Fails with `RepoError::UniqueViolation` when the CI is taken.
    async fn insert(&self, input: &PatientInput) -> Result<Patient, RepoError>;

    /// Overwrite every field; `None` when no patient has this id.
    async fn update(&self, id: i64, input: &PatientInput) -> Result<Option<Patient>, RepoError>;

    /// `false` when no patient has this id.
    async fn delete(&self, id: i64) -> Result<bool, RepoError>;
}

pub struct SqlxPatientRepo {
    db: SqlitePool,
}

impl SqlxPatientRepo {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PatientRepo for SqlxPatientRepo {
    async fn list_all(&self) -> Result<Vec<Patient>, RepoError> {
        let rows = sqlx::query_as::<_, Patient>(
            r#"
            SELECT id, name, lastname, ci, birth_date
            FROM patients
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>, RepoError> {
        let row = sqlx::query_as::<_, Patient>(
            r#"
            SELECT id, name, lastname, ci, birth_date
            FROM patients
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert(&self, input: &PatientInput) -> Result<Patient, RepoError> {
        let row = sqlx::query_as::<_, Patient>(
            r#"
            INSERT INTO patients (name, lastname, ci, birth_date)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, lastname, ci, birth_date
            "#,
        )
        .bind(&input.name)
        .bind(&input.lastname)
        .bind(&input.ci)
        .bind(&input.birth_date)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, input: &PatientInput) -> Result<Option<Patient>, RepoError> {
        let row = sqlx::query_as::<_, Patient>(
            r#"
            UPDATE patients
               SET name = ?, lastname = ?, ci = ?, birth_date = ?
             WHERE id = ?
            RETURNING id, name, lastname, ci, birth_date
            "#,
        )
        .bind(&input.name)
        .bind(&input.lastname)
        .bind(&input.ci)
        .bind(&input.birth_date)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM patients WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
