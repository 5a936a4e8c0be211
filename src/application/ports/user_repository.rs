use async_trait::async_trait;

use crate::domain::users::user::{LinkInput, LinkUpdateInput, User};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("user not found")]
    UserNotFound,
    #[error("link not found")]
    LinkNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("link already exists")]
    LinkAlreadyExists,
    /// A user inserted moments ago could not be read back.
    #[error("failed to retrieve created user")]
    UserRetrievalFailed,
    #[error("failed to scan rows")]
    DataScanFailed(#[source] anyhow::Error),
    #[error("no rows were affected by the operation")]
    NoRowsAffected,
    #[error("database operation failed")]
    DatabaseOperation(#[source] anyhow::Error),
}

/// Persistence for the user aggregate and its links.
///
/// Link mutations are ownership-scoped: a link that belongs to someone else is
/// reported as [`StoreError::LinkNotFound`], exactly like a missing one.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        email: &str,
        username: &str,
        password_hash: &[u8],
        about_text: &str,
        links: &[LinkInput],
    ) -> Result<User, StoreError>;
    async fn user_by_email(&self, email: &str) -> Result<User, StoreError>;
    async fn user_by_id(&self, id: i64) -> Result<User, StoreError>;
    async fn user_by_username(&self, username: &str) -> Result<User, StoreError>;
    async fn update_about_me(&self, id: i64, text: &str) -> Result<(), StoreError>;
    async fn add_link(&self, user_id: i64, link: &LinkInput) -> Result<(), StoreError>;
    async fn update_link(&self, user_id: i64, link: &LinkUpdateInput) -> Result<(), StoreError>;
    async fn delete_link(&self, user_id: i64, link_id: i64) -> Result<(), StoreError>;
}
