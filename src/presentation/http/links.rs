use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::application::use_cases::links::add_links::AddLinks;
use crate::application::use_cases::links::delete_link::DeleteLink;
use crate::application::use_cases::links::update_link::UpdateLink;
use crate::bootstrap::app_context::AppContext;
use crate::domain::users::user::{LinkInput, LinkUpdateInput};
use crate::presentation::http::auth::{Bearer, authenticated_user_id};
use crate::presentation::http::error::ApiError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteLinkRequest {
    pub id: i64,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/profile/link",
            post(add_links).put(update_link).delete(delete_link),
        )
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/profile/link", tag = "Links", request_body = [LinkInput], responses(
    (status = 200),
    (status = 400, body = ErrorBody),
    (status = 404, body = ErrorBody),
    (status = 409, body = ErrorBody)
))]
pub async fn add_links(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(links): Json<Vec<LinkInput>>,
) -> Result<StatusCode, ApiError> {
    let user_id = authenticated_user_id(&ctx.cfg, &bearer)?;
    let repo = ctx.user_repo();
    let uc = AddLinks {
        repo: repo.as_ref(),
    };
    uc.execute(user_id, &links).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(put, path = "/api/profile/link", tag = "Links", request_body = LinkUpdateInput, responses(
    (status = 200),
    (status = 400, body = ErrorBody),
    (status = 404, body = ErrorBody),
    (status = 409, body = ErrorBody)
))]
pub async fn update_link(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(link): Json<LinkUpdateInput>,
) -> Result<StatusCode, ApiError> {
    let user_id = authenticated_user_id(&ctx.cfg, &bearer)?;
    let repo = ctx.user_repo();
    let uc = UpdateLink {
        repo: repo.as_ref(),
    };
    uc.execute(user_id, &link).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(delete, path = "/api/profile/link", tag = "Links", request_body = DeleteLinkRequest, responses(
    (status = 200),
    (status = 404, body = ErrorBody)
))]
pub async fn delete_link(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<DeleteLinkRequest>,
) -> Result<StatusCode, ApiError> {
    let user_id = authenticated_user_id(&ctx.cfg, &bearer)?;
    let repo = ctx.user_repo();
    let uc = DeleteLink {
        repo: repo.as_ref(),
    };
    uc.execute(user_id, req.id).await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::http::test_support::{signed_up, test_context};

    fn body(name: &str, path: &str) -> LinkInput {
        LinkInput {
            link_name: name.into(),
            link_color: String::new(),
            link_path: path.into(),
        }
    }

    #[test]
    fn request_bodies_deserialize_into_link_inputs() {
        let links: Vec<LinkInput> =
            serde_json::from_str(r#"[{"link_name":"a","link_path":"/a"}]"#).unwrap();
        assert_eq!(links, vec![body("a", "/a")]);

        let update: LinkUpdateInput = serde_json::from_str(
            r##"{"link_id":3,"link_name":"a","link_color":"#fff","link_path":"/a"}"##,
        )
        .unwrap();
        assert_eq!(update.link_id, 3);
        assert_eq!(update.link_color, "#fff");
    }

    #[tokio::test]
    async fn add_update_delete_through_handlers() {
        let (ctx, _dir) = test_context().await;
        let (user_id, token) = signed_up(&ctx, "bob@x.com", "bob").await;

        add_links(
            State(ctx.clone()),
            Bearer(token.clone()),
            Json(vec![body("site", "http://bob.dev")]),
        )
        .await
        .unwrap();
        let dup = add_links(
            State(ctx.clone()),
            Bearer(token.clone()),
            Json(vec![body("again", "http://bob.dev")]),
        )
        .await
        .unwrap_err();
        assert_eq!(dup.status, StatusCode::CONFLICT);

        let link_id = ctx.user_repo().user_by_id(user_id).await.unwrap().links[0].id;
        update_link(
            State(ctx.clone()),
            Bearer(token.clone()),
            Json(LinkUpdateInput {
                link_id,
                link_name: "site2".into(),
                link_color: "#fff".into(),
                link_path: "http://bob.dev".into(),
            }),
        )
        .await
        .unwrap();
        let links = ctx.user_repo().user_by_id(user_id).await.unwrap().links;
        assert_eq!(links[0].link_name, "site2");

        delete_link(
            State(ctx.clone()),
            Bearer(token.clone()),
            Json(DeleteLinkRequest { id: link_id }),
        )
        .await
        .unwrap();
        let missing = delete_link(
            State(ctx.clone()),
            Bearer(token),
            Json(DeleteLinkRequest { id: link_id }),
        )
        .await
        .unwrap_err();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn incomplete_link_is_bad_request() {
        let (ctx, _dir) = test_context().await;
        let (_, token) = signed_up(&ctx, "a@b.com", "alice").await;

        let err = add_links(State(ctx), Bearer(token), Json(vec![body("", "/x")]))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn other_users_links_are_not_found() {
        let (ctx, _dir) = test_context().await;
        let (owner_id, owner_token) = signed_up(&ctx, "a@b.com", "alice").await;
        let (_, other_token) = signed_up(&ctx, "c@d.com", "carol").await;
        add_links(
            State(ctx.clone()),
            Bearer(owner_token),
            Json(vec![body("mine", "/mine")]),
        )
        .await
        .unwrap();
        let link_id = ctx.user_repo().user_by_id(owner_id).await.unwrap().links[0].id;

        let err = update_link(
            State(ctx.clone()),
            Bearer(other_token.clone()),
            Json(LinkUpdateInput {
                link_id,
                link_name: "taken".into(),
                link_color: String::new(),
                link_path: "/taken".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = delete_link(
            State(ctx.clone()),
            Bearer(other_token),
            Json(DeleteLinkRequest { id: link_id }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
