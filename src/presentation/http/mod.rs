pub mod auth;
pub mod error;
pub mod health;
pub mod links;
pub mod profile;
pub mod request_id;
