// Fill the page view table with demo data
// Usage: cargo run --bin seed_page_views -- --count 1000 --interval past-three-months

use clap::Parser;
use std::sync::Arc;

use site_analytics::{
    config::Config,
    database::{self, PageViewRepository, PgPageViewStore},
    services::seed_data::{Interval, PageViewFactory, DEFAULT_ROUTES},
};

#[derive(Parser, Debug)]
#[command(about = "Insert fake page views for demos")]
struct Args {
    /// Number of page views to create
    #[arg(short, long, default_value_t = 100)]
    count: usize,

    /// How far back the visits may reach
    #[arg(short, long, value_enum, default_value_t = Interval::ThisMonth)]
    interval: Interval,

    /// Site URL the pages live under (defaults to APP_URL)
    #[arg(long)]
    site_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_analytics=info".into())
        )
        .init();

    let config = Config::from_env()?;
    let site_url = args.site_url.unwrap_or_else(|| config.app_url.clone());

    let pool = database::new_pool(&config.database_url).await?;
    database::run_migrations(&pool).await?;
    let store = PgPageViewStore::new(Arc::clone(&pool));

    let routes: Vec<String> = DEFAULT_ROUTES.iter().map(|r| r.to_string()).collect();
    let mut factory = PageViewFactory::new(&site_url, &routes, args.interval);
    let now = chrono::Utc::now().naive_utc();

    for view in factory.make_many(args.count, now) {
        store.insert(view).await?;
    }

    println!("✅ Inserted {} page views ({:?}) for {}", args.count, args.interval, site_url);
    println!("📊 Table now holds {} page views", store.count().await?);

    Ok(())
}
