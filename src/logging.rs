//! Log output for the binary.

use tracing::metadata::LevelFilter;

/// Installs the global subscriber: human-readable lines with timestamps and call sites, filtered at `INFO`
/// unless `RUST_LOG` says otherwise.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer().with_file(true).with_line_number(true))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
}
