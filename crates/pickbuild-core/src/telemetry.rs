//! Tracing initialisation for the pickbuild binary.
//!
//! Call [`init_tracing`] once at program start. Log lines go to stderr so
//! they never interleave with prompt answers read from stdin or the report
//! printed on stdout.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events follow the requested level; everything else logs
/// warnings only.
const OWN_TARGETS: [&str; 2] = ["pickbuild_core", "pickbuild"];

/// Default filter directives when `RUST_LOG` is not set,
/// e.g. `warn,pickbuild_core=debug,pickbuild=debug`.
fn default_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    OWN_TARGETS
        .iter()
        .fold(String::from("warn"), |acc, target| {
            format!("{acc},{target}={level}")
        })
}

/// Initialise the global tracing subscriber.
///
/// * `json` — emit newline-delimited JSON log lines.
/// * `level` — default verbosity when `RUST_LOG` is not set.
///
/// Only the first call takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}
