//! Diagnostic logging setup
//!
//! Library code emits `tracing` events; the binary installs a subscriber that
//! writes them to stderr so they never interleave with report tables on stdout.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "warn";

/// Filter used with `--verbose`
const VERBOSE_FILTER: &str = "warn,census=debug";

/// Install the global subscriber. Calling it twice is harmless.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
