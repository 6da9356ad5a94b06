use anyhow::Context;
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vision_llm_service::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if any.
    // A missing file is fine (settings may come from the host); an unreadable one is not.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("warn", Level::INFO))
        .with(telemetry::layer())
        .try_init()
        .context("installing tracing subscriber")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => warn!("no .env file found; using process environment"),
        Err(e) => return Err(e).context("reading .env file"),
    }

    api::start().await.context("image enrichment API failed")?;

    Ok(())
}
