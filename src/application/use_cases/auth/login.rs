use argon2::Argon2;
use password_hash::{PasswordHash, PasswordVerifier};

use crate::application::ports::user_repository::{StoreError, UserRepository};
use crate::domain::users::user::User;

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    /// `Ok(None)` covers both an unknown email and a wrong password.
    pub async fn execute(&self, req: &LoginRequest) -> anyhow::Result<Option<User>> {
        let user = match self.repo.user_by_email(&req.email).await {
            Ok(u) => u,
            Err(StoreError::UserNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if password_matches(&req.password, &user.hashed_password)? {
            Ok(Some(user))
        } else {
            tracing::debug!(user_id = user.id, "password mismatch");
            Ok(None)
        }
    }
}

/// Checks `password` against a stored digest. bcrypt digests (`$2a$`, `$2b$`,
/// `$2y$`) are the norm; argon2 PHC strings are still accepted.
fn password_matches(password: &str, stored: &[u8]) -> anyhow::Result<bool> {
    let stored = std::str::from_utf8(stored)?;
    if stored.starts_with("$2") {
        return Ok(bcrypt::verify(password, stored)?);
    }
    let parsed = PasswordHash::new(stored).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
