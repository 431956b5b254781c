//! Diagnostic logging
//!
//! Logs go to stderr through `tracing-subscriber`. `RUST_LOG` wins when set;
//! otherwise `--verbose` enables debug output for this crate.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is absent
#[must_use]
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,barracks_cli=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber; later calls are no-ops
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();

    if result.is_err() {
        tracing::debug!("logging already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_crate_debug() {
        assert_eq!(default_directive(false), "warn");
        assert!(default_directive(true).contains("barracks_cli=debug"));
        assert!(EnvFilter::try_new(default_directive(true)).is_ok());
    }

    #[test]
    fn init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
