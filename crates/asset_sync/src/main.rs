pub mod shared;
pub mod usecases;

use shared::config::{load_config, Credentials};
use usecases::u501_sync_devices::asset_api_client::AssetApiClient;
use usecases::u501_sync_devices::executor::SyncExecutor;
use usecases::u501_sync_devices::graph_api_client::GraphApiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Создаем директорию для логов
    let log_dir = std::path::Path::new("logs");
    std::fs::create_dir_all(log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("asset_sync.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,hyper=warn,reqwest=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    // Ошибка запуска только логируется, код выхода остаётся нулевым
    if let Err(e) = run().await {
        tracing::error!("An error occurred: {:#}", e);
    }

    Ok(())
}

async fn run() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!(".env not found, using process environment"),
        Err(e) => return Err(e.into()),
    }

    let config = load_config()?;
    let credentials = Credentials::from_env()?;
    tracing::debug!("Using credentials: {:?}", credentials);

    let graph = GraphApiClient::new(&credentials, &config.directory, &config.http)?;
    let assets = AssetApiClient::new(&credentials, &config.http)?;
    let executor = SyncExecutor::new(graph, assets, config.assets.clone());

    if let Some(report) = executor.run().await? {
        tracing::debug!(
            "Run {} finished with status {:?}",
            report.run_id,
            report.status
        );
    }

    Ok(())
}
