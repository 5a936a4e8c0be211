use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::use_cases::profile::get_my_profile::GetMyProfile;
use crate::application::use_cases::profile::get_public_profile::GetPublicProfile;
use crate::application::use_cases::profile::update_about::UpdateAbout;
use crate::bootstrap::app_context::AppContext;
use crate::domain::users::user::{Link, User};
use crate::presentation::http::auth::{Bearer, authenticated_user_id};
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
pub struct OwnedLink {
    pub id: i64,
    pub link_name: String,
    pub link_color: String,
    pub link_path: String,
}

impl From<Link> for OwnedLink {
    fn from(l: Link) -> Self {
        OwnedLink {
            id: l.id,
            link_name: l.link_name,
            link_color: l.link_color,
            link_path: l.link_path,
        }
    }
}

/// The signed-in user's own view; link ids are included for editing.
#[derive(Debug, Serialize, ToSchema)]
pub struct MyProfile {
    pub email: String,
    pub username: String,
    pub about: String,
    pub links: Vec<OwnedLink>,
}

impl From<User> for MyProfile {
    fn from(u: User) -> Self {
        MyProfile {
            email: u.email,
            username: u.username,
            about: u.about_text,
            links: u.links.into_iter().map(Into::into).collect(),
        }
    }
}

/// A link as shown to visitors; ids stay private.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicLink {
    pub link_name: String,
    pub link_color: String,
    pub link_path: String,
}

impl From<Link> for PublicLink {
    fn from(l: Link) -> Self {
        PublicLink {
            link_name: l.link_name,
            link_color: l.link_color,
            link_path: l.link_path,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicProfile {
    pub username: String,
    pub about: String,
    pub links: Vec<PublicLink>,
}

impl From<User> for PublicProfile {
    fn from(u: User) -> Self {
        PublicProfile {
            username: u.username,
            about: u.about_text,
            links: u.links.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAboutRequest {
    pub text: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/profile", get(my_profile))
        .route("/profile/about", post(update_about))
        .route("/profile/:username", get(public_profile))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/profile", tag = "Profile", responses(
    (status = 200, body = MyProfile),
    (status = 401, body = ErrorBody),
    (status = 404, body = ErrorBody)
))]
pub async fn my_profile(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Json<MyProfile>, ApiError> {
    let user_id = authenticated_user_id(&ctx.cfg, &bearer)?;
    let repo = ctx.user_repo();
    let uc = GetMyProfile {
        repo: repo.as_ref(),
    };
    let user = uc.execute(user_id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(get, path = "/api/profile/{username}", tag = "Profile", security(()),
    params(("username" = String, Path, description = "Public username")),
    responses(
        (status = 200, body = PublicProfile),
        (status = 404, body = ErrorBody)
    ))]
pub async fn public_profile(
    State(ctx): State<AppContext>,
    Path(username): Path<String>,
) -> Result<Json<PublicProfile>, ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::bad_request("username is required"));
    }
    let repo = ctx.user_repo();
    let uc = GetPublicProfile {
        repo: repo.as_ref(),
    };
    let user = uc.execute(&username).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(post, path = "/api/profile/about", tag = "Profile", request_body = UpdateAboutRequest, responses(
    (status = 200),
    (status = 404, body = ErrorBody)
))]
pub async fn update_about(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<UpdateAboutRequest>,
) -> Result<StatusCode, ApiError> {
    let user_id = authenticated_user_id(&ctx.cfg, &bearer)?;
    let repo = ctx.user_repo();
    let uc = UpdateAbout {
        repo: repo.as_ref(),
    };
    uc.execute(user_id, &req.text).await?;
    Ok(StatusCode::OK)
}
