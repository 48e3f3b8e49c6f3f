//! Runtime configuration.
//!
//! The probe has no config file and no options. The only knob is where to
//! write the JSONL structured log, taken from the `GAIPROBE_LOG` environment
//! variable. Unset or empty disables logging.

use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable naming the structured log destination.
pub const LOG_ENV: &str = "GAIPROBE_LOG";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub log_path: Option<PathBuf>,
}

impl ProbeConfig {
    /// Build from an environment lookup.
    pub fn from_sources<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let log_path = env(LOG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self { log_path }
    }

    /// Build from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_sources(|key| std::env::var_os(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<OsString> {
        None
    }

    #[test]
    fn defaults_to_no_log() {
        assert_eq!(ProbeConfig::from_sources(no_env), ProbeConfig::default());
    }

    #[test]
    fn env_supplies_log_path() {
        let cfg = ProbeConfig::from_sources(|key| {
            (key == LOG_ENV).then(|| OsString::from("/tmp/gai.jsonl"))
        });
        assert_eq!(cfg.log_path, Some(PathBuf::from("/tmp/gai.jsonl")));
    }

    #[test]
    fn other_variables_are_ignored() {
        let cfg = ProbeConfig::from_sources(|key| {
            (key != LOG_ENV).then(|| OsString::from("elsewhere.jsonl"))
        });
        assert_eq!(cfg.log_path, None);
    }

    #[test]
    fn empty_value_disables_logging() {
        let cfg = ProbeConfig::from_sources(|_| Some(OsString::new()));
        assert_eq!(cfg.log_path, None);
    }
}
