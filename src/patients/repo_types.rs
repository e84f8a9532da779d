use sqlx::FromRow;

/// Patient record in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub lastname: String,
    pub ci: String,         // identity document number, unique
    pub birth_date: String, // free-form, not parsed
}

/// Field values for an insert or a full overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientInput {
    pub name: String,
    pub lastname: String,
    pub ci: String,
    pub birth_date: String,
}
