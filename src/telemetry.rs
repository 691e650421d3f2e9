//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` (via [`Config::log_level`]); the output
/// is plain text or JSON depending on [`Config::log_format`]. Logs go to
/// stderr so command output on stdout stays machine-readable.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
