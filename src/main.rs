use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

use profile_api::bootstrap::app_context::{AppContext, AppServices};
use profile_api::bootstrap::config::Config;
use profile_api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            profile_api::presentation::http::auth::sign_up,
            profile_api::presentation::http::auth::login,
            profile_api::presentation::http::auth::logout,
            profile_api::presentation::http::profile::my_profile,
            profile_api::presentation::http::profile::public_profile,
            profile_api::presentation::http::profile::update_about,
            profile_api::presentation::http::links::add_links,
            profile_api::presentation::http::links::update_link,
            profile_api::presentation::http::links::delete_link,
            profile_api::presentation::http::health::health,
        ),
        components(schemas(
            profile_api::presentation::http::auth::SignUpRequest,
            profile_api::presentation::http::auth::LoginRequest,
            profile_api::presentation::http::auth::AuthResponse,
            profile_api::presentation::http::auth::UserResponse,
            profile_api::presentation::http::profile::MyProfile,
            profile_api::presentation::http::profile::OwnedLink,
            profile_api::presentation::http::profile::PublicProfile,
            profile_api::presentation::http::profile::UpdateAboutRequest,
            profile_api::presentation::http::profile::PublicLink,
            profile_api::domain::users::user::LinkInput,
            profile_api::domain::users::user::LinkUpdateInput,
            profile_api::presentation::http::links::DeleteLinkRequest,
            profile_api::presentation::http::error::ErrorBody,
            profile_api::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Auth", description = "Authentication"),
            (name = "Profile", description = "Own and public profiles"),
            (name = "Links", description = "Profile links management"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "profile_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        api_port = cfg.api_port,
        database_url = %cfg.database_url,
        production = cfg.is_production,
        "Starting profile backend"
    );

    // Database
    let pool =
        profile_api::infrastructure::db::connect_pool(&cfg.database_url, &cfg.pool_settings())
            .await?;
    profile_api::infrastructure::db::migrate(&pool).await?;

    let user_repo = Arc::new(SqlxUserRepository::new(pool.clone()));
    let ctx = AppContext::new(cfg.clone(), AppServices::new(user_repo));

    let cors = build_cors(&cfg);

    let app = Router::new()
        .nest(
            "/api",
            profile_api::presentation::http::health::routes(pool.clone()),
        )
        .nest(
            "/api/auth",
            profile_api::presentation::http::auth::routes(ctx.clone()),
        )
        .nest(
            "/api",
            profile_api::presentation::http::profile::routes(ctx.clone()),
        )
        .nest(
            "/api",
            profile_api::presentation::http::links::routes(ctx.clone()),
        )
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors);
    let app = profile_api::presentation::http::request_id::layer(app);

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // In-flight handlers are gone by now; let SQLite checkpoint the WAL.
    pool.close().await;
    info!("Shut down cleanly");
    Ok(())
}

fn build_cors(cfg: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .expose_headers([http::HeaderName::from_static(
            profile_api::presentation::http::request_id::REQUEST_ID_HEADER,
        )]);
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        Some(Err(_)) => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
        // Production requires FRONTEND_URL (checked in Config), so deny all here.
        None if cfg.is_production => base.allow_origin(AllowOrigin::exact(
            HeaderValue::from_static("http://invalid"),
        )),
        None => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
