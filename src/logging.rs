//! `tracing` targets and optional subscriber bootstrap.
//!
//! The library only emits events; installing a subscriber is left to the host
//! unless it opts into [`init`].

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

pub const DISPATCH_TARGET: &str = "tui_adapters::dispatch";
pub const BINDING_TARGET: &str = "tui_adapters::binding";
pub const CONFIG_TARGET: &str = "tui_adapters::config";

const DEFAULT_FILTER: &str = "tui_adapters=debug";

/// Install a global fmt subscriber according to `config`.
///
/// Returns `false` when logging was not requested or when a global subscriber
/// already exists.
pub fn init(config: &EnvConfig) -> bool {
    if !config.logging_requested() {
        return false;
    }

    let filter = config
        .log_filter
        .as_deref()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false);

    if let Some(path) = config.log_file.as_deref() {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => return builder.with_writer(Mutex::new(file)).try_init().is_ok(),
            Err(err) => {
                eprintln!("tui_adapters: cannot open log file {path}: {err}; logging to stderr");
            }
        }
    }

    builder.with_writer(std::io::stderr).try_init().is_ok()
}

#[cfg(test)]
mod tests {
    use super::init;
    use crate::config::EnvConfig;

    #[test]
    fn init_is_noop_without_request() {
        let config = EnvConfig {
            debug: false,
            log_filter: None,
            log_file: None,
        };
        assert!(!init(&config));
    }
}
