//! Applies pending migrations and exits.

use dotenvy::dotenv;
use tracing::info;

use profile_api::bootstrap::config::Config;
use profile_api::infrastructure::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "profile_api=info,sqlx=warn".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    let pool = db::connect_pool(&cfg.database_url, &cfg.pool_settings()).await?;
    db::migrate(&pool).await?;
    info!(database_url = %cfg.database_url, "migrations applied");
    pool.close().await;
    Ok(())
}
