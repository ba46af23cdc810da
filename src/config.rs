//! Environment configuration and construction-time adapter defaults.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub debug: bool,
    pub log_filter: Option<String>,
    pub log_file: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            debug: env_flag("TUI_ADAPTERS_DEBUG"),
            log_filter: env_string_opt("TUI_ADAPTERS_LOG"),
            log_file: env_string_opt("TUI_ADAPTERS_LOG_FILE"),
        }
    }

    /// Whether any log sink was requested.
    pub fn logging_requested(&self) -> bool {
        self.debug || self.log_filter.is_some() || self.log_file.is_some()
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Style and behavior defaults shared by every adapter.
///
/// Resolved once by the host and handed to each component constructor.
/// Nothing in the dispatch path reads style from anywhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterDefaults {
    pub prompt: String,
    pub cursor_on: String,
    pub cursor_off: String,
    pub selected_prefix: String,
    pub unselected_prefix: String,
    pub submenu_marker: String,
    pub max_visible: usize,
    pub spinner_frames: Vec<String>,
    pub spinner_interval: Duration,
    pub progress_width: usize,
    pub progress_filled: char,
    pub progress_empty: char,
    pub user_label: String,
    pub assistant_label: String,
    pub no_items: String,
}

impl Default for AdapterDefaults {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            cursor_on: "\x1b[7m".to_string(),
            cursor_off: "\x1b[27m".to_string(),
            selected_prefix: "→ ".to_string(),
            unselected_prefix: "  ".to_string(),
            submenu_marker: " ›".to_string(),
            max_visible: 10,
            spinner_frames: SPINNER_FRAMES.iter().map(|frame| frame.to_string()).collect(),
            spinner_interval: Duration::from_millis(80),
            progress_width: 40,
            progress_filled: '█',
            progress_empty: '░',
            user_label: "You".to_string(),
            assistant_label: "Assistant".to_string(),
            no_items: "  No items".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AdapterDefaults, EnvConfig};
    use std::env;
    use std::sync::{Mutex, OnceLock};

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    #[test]
    fn env_defaults_disable_logging() {
        let _lock = env_lock();
        let _g1 = set_env_guard("TUI_ADAPTERS_DEBUG", None);
        let _g2 = set_env_guard("TUI_ADAPTERS_LOG", None);
        let _g3 = set_env_guard("TUI_ADAPTERS_LOG_FILE", None);

        let config = EnvConfig::from_env();
        assert!(!config.debug);
        assert!(config.log_filter.is_none());
        assert!(config.log_file.is_none());
        assert!(!config.logging_requested());
    }

    #[test]
    fn env_values_are_read() {
        let _lock = env_lock();
        let _g1 = set_env_guard("TUI_ADAPTERS_DEBUG", Some("1"));
        let _g2 = set_env_guard("TUI_ADAPTERS_LOG", Some("tui_adapters=trace"));
        let _g3 = set_env_guard("TUI_ADAPTERS_LOG_FILE", Some("/tmp/adapters.log"));

        let config = EnvConfig::from_env();
        assert!(config.debug);
        assert_eq!(config.log_filter.as_deref(), Some("tui_adapters=trace"));
        assert_eq!(config.log_file.as_deref(), Some("/tmp/adapters.log"));
        assert!(config.logging_requested());
    }

    #[test]
    fn blank_log_file_is_ignored() {
        let _lock = env_lock();
        let _g1 = set_env_guard("TUI_ADAPTERS_LOG_FILE", Some("  "));
        let config = EnvConfig::from_env();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn log_file_alone_requests_logging() {
        let config = EnvConfig {
            debug: false,
            log_filter: None,
            log_file: Some("/tmp/adapters.log".to_string()),
        };
        assert!(config.logging_requested());
    }

    #[test]
    fn defaults_have_spinner_frames() {
        let defaults = AdapterDefaults::default();
        assert_eq!(defaults.spinner_frames.len(), 10);
        assert!(defaults.max_visible > 0);
    }
}
