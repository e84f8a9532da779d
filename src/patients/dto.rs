use serde::Deserialize;

use crate::error::AppError;
use crate::forms::required;
use crate::patients::repo_types::{Patient, PatientInput};

/// Form body shared by create and update. Also re-rendered on failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatientForm {
    pub name: String,
    pub lastname: String,
    pub ci: String,
    pub birth_date: String,
}

impl PatientForm {
    pub fn validate(&self) -> Result<PatientInput, AppError> {
        Ok(PatientInput {
            name: required("Name", &self.name)?,
            lastname: required("Lastname", &self.lastname)?,
            ci: required("CI", &self.ci)?,
            birth_date: required("Birth date", &self.birth_date)?,
        })
    }
}

impl From<Patient> for PatientForm {
    fn from(p: Patient) -> Self {
        Self {
            name: p.name,
            lastname: p.lastname,
            ci: p.ci,
            birth_date: p.birth_date,
        }
    }
}

/// Patient id from a URL segment. Anything that is not an `i64` names no
/// patient, so it is `NotFound` rather than a bad request.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>().map_err(|_| AppError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_ids_are_not_found() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound)));
        assert!(matches!(
            parse_id("99999999999999999999"),
            Err(AppError::NotFound)
        ));
    }

    #[test]
    fn validate_trims_every_field() {
        let form = PatientForm {
            name: " Ana ".into(),
            lastname: "Lopez".into(),
            ci: " CI123".into(),
            birth_date: "1990-01-01 ".into(),
        };
        let input = form.validate().unwrap();
        assert_eq!(input.name, "Ana");
        assert_eq!(input.ci, "CI123");
        assert_eq!(input.birth_date, "1990-01-01");
    }

    #[test]
    fn birth_date_is_not_parsed() {
        let form = PatientForm {
            name: "Ana".into(),
            lastname: "Lopez".into(),
            ci: "CI123".into(),
            birth_date: "sometime in 1990".into(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn blank_ci_is_rejected() {
        let form = PatientForm {
            name: "Ana".into(),
            lastname: "Lopez".into(),
            ci: " ".into(),
            birth_date: "1990-01-01".into(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "CI is required");
    }
}
