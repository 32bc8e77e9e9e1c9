use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,mosaic_core=debug,mosaic_dock=debug";

/// Install the global fmt subscriber.
///
/// `RUST_LOG` overrides the default directives when set.
pub fn init() {
    if let Err(err) = try_init() {
        eprintln!("mosaic logging already initialised: {err}");
    }
}

/// Like [`init`], but reports a subscriber that is already installed.
pub fn try_init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    tracing_subscriber::fmt().with_env_filter(filter).try_init()
}
