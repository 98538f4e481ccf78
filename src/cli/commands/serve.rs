use clap::Args;

use crate::app;
use crate::config::{self, StorageBackend};

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (defaults to CMS_PORT or the environment preset)")]
    pub port: Option<u16>,

    #[arg(long, help = "Use the in-memory store regardless of STORAGE_BACKEND")]
    pub memory: bool,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = config::config().clone();
    if args.memory {
        config.storage = StorageBackend::Memory;
    }

    tracing::info!("Starting Campus CMS in {:?} mode on {:?} storage", config.environment, config.storage);
    app::serve(&config, args.port).await
}
