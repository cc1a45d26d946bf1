//! Common types and utilities for the rivulet projects.

pub mod cluster;
pub mod config;
pub mod error;

pub use ::anyhow;
pub use ::serde;
pub use ::serde_json;
pub use ::tokio;
pub use ::tracing;
pub use ::tracing_subscriber;

/// Install the `tracing` subscriber used by every rivulet binary.
/// Logs go to stderr so they never interleave with the report printed on stdout.
/// `RUST_LOG` overrides the default `warn` level.
pub fn init_tracing() {
    use ::tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
