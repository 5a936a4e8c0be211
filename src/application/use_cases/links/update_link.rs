use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::links::LinkError;
use crate::domain::users::user::LinkUpdateInput;

pub struct UpdateLink<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> UpdateLink<'a, R> {
    pub async fn execute(&self, user_id: i64, link: &LinkUpdateInput) -> Result<(), LinkError> {
        if link.link_name.trim().is_empty() || link.link_path.trim().is_empty() {
            return Err(LinkError::Incomplete);
        }
        self.repo.update_link(user_id, link).await?;
        Ok(())
    }
}
