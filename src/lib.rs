pub mod cli;
pub mod config;
pub mod dashboard; // Operational KPIs over a date window
pub mod db;
pub mod models;
pub mod protocols; // Pain reduction per treatment protocol
pub mod stats;
pub mod timeline; // Per-patient care plans, pain curve, care steps

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Honors `RUST_LOG`, writes to stderr.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);
}
