//! # Structured Logging
//!
//! Sets up the `tracing` subscriber for the CLI. Output goes to stderr so
//! stdout carries only command results (descriptor hashes, verdicts,
//! identities), which keeps them pipeable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Accepts "json" or "pretty" (case-insensitive). Anything else is `Pretty`.
    pub fn from_str_lossy(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// `RUST_LOG` when set, else `default_directives`. Unparseable directives
/// fall back to `info`.
fn build_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Only the first call takes effect; later
/// calls are ignored.
///
/// ```text
/// RUST_LOG=provenance_contracts=debug provenance-node simulate
/// ```
pub fn init_logging(default_directives: &str, format: LogFormat) {
    let filter = build_filter(default_directives);
    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false),
            )
            .try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(?format, "logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_format() {
        assert_eq!(LogFormat::from_str_lossy("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_lossy("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str_lossy("xml"), LogFormat::Pretty);
    }

    #[test]
    fn bad_directives_fall_back() {
        // Must not panic on garbage.
        let _ = build_filter("provenance_node=[[[");
    }

    #[test]
    fn second_init_is_ignored() {
        init_logging("warn", LogFormat::Json);
        init_logging("debug", LogFormat::Pretty);
    }
}
