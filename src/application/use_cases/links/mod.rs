use crate::application::ports::user_repository::StoreError;

pub mod add_links;
pub mod delete_link;
pub mod update_link;

#[derive(thiserror::Error, Debug)]
pub enum LinkError {
    #[error("link_name and link_path are required")]
    Incomplete,
    #[error(transparent)]
    Store(#[from] StoreError),
}
