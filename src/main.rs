use anyhow::Context;
use tokio::net::TcpListener;

use earnings_macro::app;
use earnings_macro::config::AppConfig;
use earnings_macro::logging::{init_logging, LoggingConfig};
use earnings_macro::services::company_directory::CompanyDirectory;
use earnings_macro::state::AppState;
use earnings_macro::store::{CachedSource, JsonDirSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env();

    let directory = match &config.company_directory_csv {
        Some(path) => {
            tracing::info!("Loading company directory from {}", path.display());
            CompanyDirectory::from_csv_path(path)
                .with_context(|| format!("Failed to load company directory {}", path.display()))?
        }
        None => CompanyDirectory::builtin(),
    };
    tracing::info!("Tracking {} companies", directory.len());

    if !config.data_dir.is_dir() {
        tracing::warn!(
            "Insight data directory {} does not exist yet; analyses will be empty",
            config.data_dir.display()
        );
    }

    let source = CachedSource::new(
        JsonDirSource::new(config.data_dir.clone()),
        config.record_cache_ttl_secs,
    );
    let state = AppState::new(directory, source);
    let app = app::create_app(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Earnings macro backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
