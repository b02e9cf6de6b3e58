//! Structured logging setup
//!
//! Provides JSON-formatted and human-readable logging. Logs always go to
//! stderr so generated stories on stdout stay clean.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when `RUST_LOG` is not set
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "storyloom=debug"
    } else {
        "storyloom=warn"
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the `verbose` flag.
///
/// # Arguments
///
/// * `verbose` - Raise the default level to debug
/// * `json` - Emit JSON lines instead of human-readable output
///
/// # Errors
///
/// Returns error if the filter cannot be built or a subscriber is already set
///
/// # Examples
///
/// ```no_run
/// use storyloom::logging::init_tracing;
///
/// init_tracing(false, false).unwrap();
/// tracing::info!("logging ready");
/// ```
pub fn init_tracing(verbose: bool, json: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        let layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    }

    Ok(())
}
