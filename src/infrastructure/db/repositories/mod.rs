pub(crate) mod constraint;
pub mod user_repository_sqlx;
