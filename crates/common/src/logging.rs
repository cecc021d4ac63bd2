//! Tracing setup for rsurf binaries.
//!
//! Diagnostics always go to stderr: stdout may be carrying PNG bytes.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Filter directive used by `--verbose`.
pub const VERBOSE_DIRECTIVE: &str = "debug";

/// Pick the filter directive: `--verbose`, then `RUST_LOG`, then the config file.
pub fn filter_directive(config: &LoggingConfig, verbose: bool, rust_log: Option<&str>) -> String {
    if verbose {
        return VERBOSE_DIRECTIVE.to_string();
    }
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(env) => env.to_string(),
        None => config.level.clone(),
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: &LoggingConfig, verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(config, verbose, rust_log.as_deref());
    let env_filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("rsurf: ignoring log filter {directive:?}: {e}");
        EnvFilter::new(LoggingConfig::default().level)
    });

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(
            builder
                .with_target(verbose)
                .without_time()
                .finish(),
        )
    };
    installed.ok();
}
