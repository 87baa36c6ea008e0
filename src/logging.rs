//! Tracing setup for the binary. The library only emits events.

use tracing_subscriber::EnvFilter;

/// Log to stderr. `RUST_LOG` takes precedence; otherwise `debug` for this
/// crate when verbose and `warn` when not.
pub fn init(verbose: bool) {
    let default_level = if verbose { "talabia=debug" } else { "talabia=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
