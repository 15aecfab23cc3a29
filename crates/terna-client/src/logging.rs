//! Console logging setup.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber filtering at `level`.
///
/// `RUST_LOG` takes precedence when set. Returns false if a global
/// subscriber was already installed, in which case nothing changes.
pub fn init_tracing(level: Level) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
