use sqlx::PgPool;
use std::sync::Arc;

use crate::error::StoreError;

pub mod page_views;

pub use page_views::{PageViewRepository, PgPageViewStore, SharedPageViewStore};

pub type DatabasePool = Arc<PgPool>;

pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    // sslmode in DATABASE_URL decides TLS; native-tls is compiled in.
    let pool = PgPool::connect(database_url).await?;

    if database_url.contains("sslmode=require") || database_url.contains("sslmode=prefer") {
        tracing::info!("Database connection configured to use TLS");
    } else if !database_url.contains("localhost") && !database_url.contains("127.0.0.1") {
        tracing::warn!("Connecting to remote database without explicit sslmode. Consider adding sslmode=require");
    }

    Ok(pool)
}

pub async fn new_pool(database_url: &str) -> anyhow::Result<DatabasePool> {
    let pool = create_pool(database_url).await?;
    Ok(Arc::new(pool))
}

/// Applies everything under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
