use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Installs a global subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing() {
    let env_filter =
        tracing_subscriber::filter::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let app_name = env!("CARGO_PKG_NAME").replace('-', "_");
            tracing_subscriber::filter::EnvFilter::new(format!("{app_name}=warn"))
        });
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().without_time())
        .with(env_filter)
        .try_init();
}
