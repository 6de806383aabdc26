//! Subscriber installation.
//!
//! `RUST_LOG` overrides the default `burndown=info` filter. Output goes to
//! stderr; stdout carries command output.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "burndown=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines
    Development,
    /// One JSON object per event
    Production,
    /// In-memory capture, see [`super::test_capture`]
    Test,
}

static INIT_ONCE: Once = Once::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber for `profile`. Only the first call has
/// any effect.
///
/// ```
/// use burndown_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let fmt = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter());
        let installed = match profile {
            Profile::Development => fmt.try_init(),
            Profile::Production => fmt.json().try_init(),
            Profile::Test => {
                super::test_capture::init_test_capture();
                Ok(())
            }
        };
        if let Err(e) = installed {
            eprintln!("logging not initialized: {e}");
        }
    });
}
