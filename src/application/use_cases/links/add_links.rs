use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::links::LinkError;
use crate::domain::users::user::LinkInput;

pub struct AddLinks<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> AddLinks<'a, R> {
    /// Every link is validated before any is written. Links are then added in
    /// order; the first store failure stops the batch and earlier links stay.
    pub async fn execute(&self, user_id: i64, links: &[LinkInput]) -> Result<(), LinkError> {
        if links.iter().any(|l| !l.is_complete()) {
            return Err(LinkError::Incomplete);
        }
        for link in links {
            self.repo.add_link(user_id, link).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::user_repository::StoreError;
    use crate::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
    use crate::infrastructure::db::test_support::fresh_pool;

    fn link(name: &str, path: &str) -> LinkInput {
        LinkInput {
            link_name: name.into(),
            link_color: String::new(),
            link_path: path.into(),
        }
    }

    #[tokio::test]
    async fn incomplete_batch_writes_nothing() {
        let (pool, _dir) = fresh_pool().await;
        let repo = SqlxUserRepository::new(pool);
        let user = repo
            .create_user("a@b.com", "alice", b"x", "", &[])
            .await
            .unwrap();
        let uc = AddLinks { repo: &repo };

        let res = uc
            .execute(user.id, &[link("ok", "/ok"), link("", "/missing-name")])
            .await;
        assert!(matches!(res, Err(LinkError::Incomplete)));
        assert!(repo.user_by_id(user.id).await.unwrap().links.is_empty());
    }

    #[tokio::test]
    async fn stops_at_the_first_duplicate() {
        let (pool, _dir) = fresh_pool().await;
        let repo = SqlxUserRepository::new(pool);
        let user = repo
            .create_user("a@b.com", "alice", b"x", "", &[])
            .await
            .unwrap();
        let uc = AddLinks { repo: &repo };

        let res = uc
            .execute(
                user.id,
                &[link("a", "/a"), link("again", "/a"), link("c", "/c")],
            )
            .await;
        assert!(matches!(
            res,
            Err(LinkError::Store(StoreError::LinkAlreadyExists))
        ));
        let stored = repo.user_by_id(user.id).await.unwrap().links;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].link_path, "/a");
    }
}
