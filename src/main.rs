use memory_finder::config::Config;
use memory_finder::infrastructure::AppContainer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "memory_finder=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    // LOG_FORMAT=json for structured output in production
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = Config::from_env();
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        workers = config.ingestion.worker_count,
        "Starting Memory Finder"
    );

    let container = AppContainer::new(config).await?;
    container.into_server().run().await
}
