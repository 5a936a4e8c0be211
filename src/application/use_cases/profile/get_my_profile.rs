use crate::application::ports::user_repository::{StoreError, UserRepository};
use crate::domain::users::user::User;

pub struct GetMyProfile<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetMyProfile<'a, R> {
    pub async fn execute(&self, user_id: i64) -> Result<User, StoreError> {
        self.repo.user_by_id(user_id).await
    }
}
