use ingest::{run, IngestConfig, ScrapeError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    init_tracing();

    tracing::info!(
        project = rollcall_core::PROJECT_NAME,
        version = rollcall_core::PROJECT_VERSION,
        "rollcall - legislative roster scraper"
    );

    if let Err(e) = try_main().await {
        tracing::error!(error = %e, "run failed");
        std::process::exit(e.exit_code());
    }
}

async fn try_main() -> Result<(), ScrapeError> {
    let config = IngestConfig::from_env()?;
    tracing::info!(
        target_key = %config.target.key,
        url = %config.target.url,
        strategy = %config.strategy,
        output = %config.output.display(),
        "configuration loaded"
    );

    let summary = run(&config).await?;
    tracing::info!(
        members = summary.members,
        output = %summary.output.display(),
        "saved {} members of {}",
        summary.members,
        summary.target
    );
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
