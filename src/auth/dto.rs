use serde::Deserialize;

use crate::error::AppError;
use crate::forms::required;

/// Form body for `POST /login`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Form body for `POST /users`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub role: String,
}

/// Validated credentials. The password is taken verbatim.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, AppError> {
        Ok(Credentials {
            username: required("Username", &self.username)?,
            password: non_empty_password(&self.password)?,
        })
    }
}

impl RegisterForm {
    pub fn validate(&self) -> Result<Registration, AppError> {
        Ok(Registration {
            username: required("Username", &self.username)?,
            password: non_empty_password(&self.password)?,
            role: required("Role", &self.role)?,
        })
    }
}

fn non_empty_password(password: &str) -> Result<String, AppError> {
    if password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }
    Ok(password.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_form_trims_username_but_not_password() {
        let form = RegisterForm {
            username: " drsmith ".into(),
            password: " pw123 ".into(),
            role: "doctor".into(),
        };
        let reg = form.validate().unwrap();
        assert_eq!(reg.username, "drsmith");
        assert_eq!(reg.password, " pw123 ");
        assert_eq!(reg.role, "doctor");
    }

    #[test]
    fn missing_fields_are_rejected() {
        let err = RegisterForm {
            username: "drsmith".into(),
            password: "pw".into(),
            role: String::new(),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = LoginForm {
            username: "drsmith".into(),
            password: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Password is required");
    }
}
