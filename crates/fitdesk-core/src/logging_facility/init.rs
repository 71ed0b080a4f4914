//! Logging initialization module
//!
//! Single initialization point for the process-wide subscriber. All
//! output goes to stderr so CLI commands can keep stdout for data.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output, debug level for fitdesk crates
    Development,
    /// JSON lines, info level
    Production,
    /// No output; tests install the capture layer instead
    Test,
}

impl Profile {
    /// Default filter directive used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> &'static str {
        match self {
            Profile::Development => "fitdesk=debug",
            Profile::Production => "fitdesk=info",
            Profile::Test => "off",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Only the first call has an effect. `RUST_LOG` overrides the profile's
/// default directive.
///
/// # Example
///
/// ```
/// use fitdesk_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    init_with_directive(profile, None);
}

/// Initialize with an explicit filter directive (e.g. from a `--log` flag)
pub fn init_with_directive(profile: Profile, directive: Option<&str>) {
    INIT_ONCE.call_once(|| {
        let filter = match directive {
            Some(d) => EnvFilter::new(d),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(profile.default_directive())),
        };
        match profile {
            Profile::Development => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter)
                    .init();
            }
            Profile::Production => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter)
                    .init();
            }
            Profile::Test => {
                tracing_subscriber::registry().init();
            }
        }
    });
}
