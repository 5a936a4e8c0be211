use crate::application::ports::user_repository::{StoreError, UserRepository};

pub struct UpdateAbout<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> UpdateAbout<'a, R> {
    pub async fn execute(&self, user_id: i64, text: &str) -> Result<(), StoreError> {
        self.repo.update_about_me(user_id, text).await
    }
}
