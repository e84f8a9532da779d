use tracing::{info, warn};

use crate::auth::{
    dto::{Credentials, Registration},
    password::{hash_password, verify_password},
    repo::UserRepo,
    repo_types::{NewUser, User},
};
use crate::db::RepoError;
use crate::error::AppError;

/// Create a user with a salted password hash.
pub async fn register(users: &dyn UserRepo, reg: Registration) -> Result<User, AppError> {
    let password_hash = hash_password(&reg.password)?;
    let new_user = NewUser {
        username: reg.username,
        password_hash,
        role: reg.role,
    };

    match users.insert(&new_user).await {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, role = %user.role, "user registered");
            Ok(user)
        }
        Err(RepoError::UniqueViolation) => {
            warn!(username = %new_user.username, "username already registered");
            Err(AppError::DuplicateUsername)
        }
        Err(e) => Err(e.into()),
    }
}

/// Check credentials. Unknown user and wrong password fail the same way.
pub async fn login(users: &dyn UserRepo, creds: Credentials) -> Result<User, AppError> {
    let Some(user) = users.find_by_username(&creds.username).await? else {
        warn!(username = %creds.username, "login unknown username");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&creds.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    fn registration(username: &str, password: &str) -> Registration {
        Registration {
            username: username.into(),
            password: password.into(),
            role: "doctor".into(),
        }
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let state = AppState::fake().await;
        let users = state.users.as_ref();

        let created = register(users, registration("drsmith", "pw123")).await.unwrap();
        assert_ne!(created.password_hash, "pw123");

        let user = login(users, credentials("drsmith", "pw123")).await.unwrap();
        assert_eq!(user.id, created.id);
        assert_eq!(user.role, "doctor");
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let state = AppState::fake().await;
        let users = state.users.as_ref();

        let first = register(users, registration("drsmith", "pw123")).await.unwrap();
        let err = register(users, registration("drsmith", "other")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateUsername));

        // The first account keeps its password.
        let user = login(users, credentials("drsmith", "pw123")).await.unwrap();
        assert_eq!(user.id, first.id);
        assert!(login(users, credentials("drsmith", "other")).await.is_err());
    }

    #[tokio::test]
    async fn wrong_password_or_unknown_user_is_invalid_credentials() {
        let state = AppState::fake().await;
        let users = state.users.as_ref();
        register(users, registration("drsmith", "pw123")).await.unwrap();

        let err = login(users, credentials("drsmith", "wrong")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let err = login(users, credentials("nobody", "wrong")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }
}
