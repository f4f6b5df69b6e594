//! Tracing subscriber setup for the CLI

use crate::constants::logging::{DEFAULT_FILTER, VERBOSE_FILTER};
use tracing_subscriber::EnvFilter;

/// Filter directives for the requested verbosity
///
/// `RUST_LOG` wins over the default, `--verbose` wins over both.
pub fn filter_directives(verbose: bool, rust_log: Option<&str>) -> String {
    if verbose {
        return VERBOSE_FILTER.to_string();
    }
    match rust_log {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Install the global subscriber, logging to stderr
pub fn init(verbose: bool) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = EnvFilter::try_new(filter_directives(verbose, rust_log.as_deref()))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        assert_eq!(filter_directives(false, None), DEFAULT_FILTER);
        assert_eq!(filter_directives(false, Some("  ")), DEFAULT_FILTER);
        assert_eq!(filter_directives(false, Some("info")), "info");
        assert_eq!(filter_directives(true, Some("info")), VERBOSE_FILTER);
    }
}
