use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "campus_cms=info,tower_http=info";

/// Installs the fmt subscriber, filtered by `RUST_LOG` when set.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    // A second init (tests, CLI serve) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
