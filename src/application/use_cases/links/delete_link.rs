use crate::application::ports::user_repository::{StoreError, UserRepository};

pub struct DeleteLink<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> DeleteLink<'a, R> {
    pub async fn execute(&self, user_id: i64, link_id: i64) -> Result<(), StoreError> {
        self.repo.delete_link(user_id, link_id).await
    }
}
