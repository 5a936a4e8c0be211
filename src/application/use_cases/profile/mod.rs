pub mod get_my_profile;
pub mod get_public_profile;
pub mod update_about;
