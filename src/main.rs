use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use site_analytics::{
    config::Config,
    database::{self, PgPageViewStore},
    router,
    services::seed_data::{self, Interval},
    AppState, SharedPageViewStore,
};

const DEMO_PAGE_VIEWS: usize = 500;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_analytics=debug,tower_http=debug".into())
        )
        .init();

    info!("Starting site analytics server...");

    let config = Arc::new(Config::from_env()?);
    info!("Configuration loaded (site host: {})", config.site_host);

    let db_pool = database::new_pool(&config.database_url).await?;
    info!("Database connection pool created");

    database::run_migrations(&db_pool).await?;

    let store: SharedPageViewStore = Arc::new(PgPageViewStore::new(db_pool.clone()));

    if config.seed_demo_data {
        seed_data::seed_demo_data(store.as_ref(), &config.app_url, DEMO_PAGE_VIEWS, Interval::ThisMonth).await?;
    }

    let app_state = AppState {
        store,
        config: config.clone(),
    };
    let app = router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    // Graceful shutdown
    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutting down gracefully...");
            db_pool.close().await;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
