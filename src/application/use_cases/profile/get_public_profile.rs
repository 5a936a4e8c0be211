use crate::application::ports::user_repository::{StoreError, UserRepository};
use crate::domain::users::user::User;

pub struct GetPublicProfile<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetPublicProfile<'a, R> {
    pub async fn execute(&self, username: &str) -> Result<User, StoreError> {
        self.repo.user_by_username(username).await
    }
}
