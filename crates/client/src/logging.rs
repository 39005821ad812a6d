//! Logging setup for the binary.
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber honouring `RUST_LOG` (default `info`).
pub fn setup_logging() {
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
