//! Telemetry utilities: tracing setup and span constructors.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();
}

/// Standardized span constructors for bot observability.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span covering one command invocation.
    pub fn invocation(author: &str, channel: u64) -> Span {
        info_span!("invocation", author = %author, channel = channel)
    }
}
