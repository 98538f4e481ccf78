use campus_cms::{app, config, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();
    telemetry::init();

    let config = config::config();
    tracing::info!("Starting Campus CMS in {:?} mode on {:?} storage", config.environment, config.storage);

    app::serve(config, None).await
}
