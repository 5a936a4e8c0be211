use crate::application::ports::user_repository::{StoreError, UserRepository};
use crate::application::validation::{is_valid_email, is_valid_password, is_valid_username};
use crate::domain::users::user::{LinkInput, User};

/// Work factor for new password digests.
pub const BCRYPT_COST: u32 = 10;

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub about_text: String,
    /// Incomplete entries are dropped by the repository.
    pub links: Vec<LinkInput>,
}

#[derive(thiserror::Error, Debug)]
pub enum RegisterError {
    #[error("password cannot be less than 6 characters")]
    WeakPassword,
    #[error("invalid email")]
    InvalidEmail,
    #[error("invalid login")]
    InvalidUsername,
    #[error("failed to hash password")]
    Hash(#[source] anyhow::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    pub async fn execute(&self, req: &RegisterRequest) -> Result<User, RegisterError> {
        if !is_valid_password(&req.password) {
            return Err(RegisterError::WeakPassword);
        }
        if !is_valid_email(&req.email) {
            return Err(RegisterError::InvalidEmail);
        }
        if !is_valid_username(&req.username) {
            return Err(RegisterError::InvalidUsername);
        }
        let hash = bcrypt::hash(&req.password, BCRYPT_COST)
            .map_err(|e| RegisterError::Hash(e.into()))?;
        let user = self
            .repo
            .create_user(
                &req.email,
                &req.username,
                hash.as_bytes(),
                &req.about_text,
                &req.links,
            )
            .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
    use crate::infrastructure::db::test_support::fresh_pool;

    fn request(email: &str, username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            username: username.into(),
            password: password.into(),
            about_text: String::new(),
            links: Vec::new(),
        }
    }

    #[tokio::test]
    async fn stores_a_hash_not_the_password() {
        let (pool, _dir) = fresh_pool().await;
        let repo = SqlxUserRepository::new(pool);
        let uc = Register { repo: &repo };

        let user = uc
            .execute(&request("a@b.com", "alice", "hunter22"))
            .await
            .unwrap();
        let stored = String::from_utf8(user.hashed_password).unwrap();
        assert!(stored.starts_with("$2"));
        assert!(!stored.contains("hunter22"));
        assert!(bcrypt::verify("hunter22", &stored).unwrap());
    }

    #[tokio::test]
    async fn rejects_invalid_input_before_touching_the_store() {
        let (pool, _dir) = fresh_pool().await;
        let repo = SqlxUserRepository::new(pool);
        let uc = Register { repo: &repo };

        assert!(matches!(
            uc.execute(&request("a@b.com", "alice", "short")).await,
            Err(RegisterError::WeakPassword)
        ));
        assert!(matches!(
            uc.execute(&request("not-an-email", "alice", "hunter22"))
                .await,
            Err(RegisterError::InvalidEmail)
        ));
        assert!(matches!(
            uc.execute(&request("a@b.com", "x", "hunter22")).await,
            Err(RegisterError::InvalidUsername)
        ));
        assert!(matches!(
            repo.user_by_email("a@b.com").await,
            Err(StoreError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn second_sign_up_with_same_email_conflicts() {
        let (pool, _dir) = fresh_pool().await;
        let repo = SqlxUserRepository::new(pool);
        let uc = Register { repo: &repo };

        uc.execute(&request("a@b.com", "alice", "hunter22"))
            .await
            .unwrap();
        let again = uc.execute(&request("a@b.com", "alice2", "hunter22")).await;
        assert!(matches!(
            again,
            Err(RegisterError::Store(StoreError::UserAlreadyExists))
        ));
    }
}
