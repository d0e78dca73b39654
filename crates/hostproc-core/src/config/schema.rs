//! Configuration structs grouped by concern.
//!
//! Loaded from environment variables with the shared fallback logic.

use super::env_keys::{host as host_keys, observability as obv_keys};
use super::loader::{env_bool, env_optional, env_or};

/// Where `process.execPath` comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecPathMode {
    /// Working directory at construction time (historical behavior).
    #[default]
    WorkingDirectory,
    /// Path of the running host executable.
    CurrentExe,
}

impl ExecPathMode {
    /// Parse `cwd` / `exe` (case-insensitive). Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cwd" | "workdir" | "working-directory" => Some(Self::WorkingDirectory),
            "exe" | "current-exe" => Some(Self::CurrentExe),
            _ => None,
        }
    }
}

/// Host settings projected into the guest `process` object.
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    /// Temp directory reported to guests; `None` when the host has none.
    pub temp_dir: Option<String>,
    pub exec_path: ExecPathMode,
}

impl HostConfig {
    /// Load from the environment, falling back to `.env`. Not cached: the
    /// guest snapshot must see the host state at construction time.
    pub fn from_env() -> Self {
        let temp_dir = env_optional(host_keys::HOSTPROC_TEMP_DIR, host_keys::TEMP_DIR_ALIASES);
        let exec_path = match env_optional(host_keys::HOSTPROC_EXEC_PATH, &[]) {
            Some(raw) => ExecPathMode::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    value = %raw,
                    "unknown {}, using working directory",
                    host_keys::HOSTPROC_EXEC_PATH
                );
                ExecPathMode::default()
            }),
            None => ExecPathMode::default(),
        };
        Self {
            temp_dir,
            exec_path,
        }
    }
}

/// Observability settings: quiet, log_level, log_json, audit_log.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
    pub audit_log: Option<String>,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            let quiet = env_bool(obv_keys::HOSTPROC_QUIET, obv_keys::QUIET_ALIASES, false);
            let log_level = env_or(
                obv_keys::HOSTPROC_LOG_LEVEL,
                obv_keys::LOG_LEVEL_ALIASES,
                || "hostproc=info".to_string(),
            );
            let log_json = env_bool(obv_keys::HOSTPROC_LOG_JSON, obv_keys::LOG_JSON_ALIASES, false);
            let audit_log = env_optional(obv_keys::HOSTPROC_AUDIT_LOG, obv_keys::AUDIT_LOG_ALIASES);
            Self {
                quiet,
                log_level,
                log_json,
                audit_log,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_path_mode_parse() {
        assert_eq!(ExecPathMode::parse("cwd"), Some(ExecPathMode::WorkingDirectory));
        assert_eq!(ExecPathMode::parse(" EXE "), Some(ExecPathMode::CurrentExe));
        assert_eq!(ExecPathMode::parse("bogus"), None);
    }

    #[test]
    fn test_exec_path_mode_default_is_working_directory() {
        assert_eq!(ExecPathMode::default(), ExecPathMode::WorkingDirectory);
        assert_eq!(HostConfig::default().temp_dir, None);
    }

    #[test]
    fn test_host_config_reads_exec_path_setting() {
        use crate::config::loader::{set_env_var, ScopedEnvGuard};
        set_env_var(host_keys::HOSTPROC_EXEC_PATH, "exe");
        let _g = ScopedEnvGuard(host_keys::HOSTPROC_EXEC_PATH);
        assert_eq!(HostConfig::from_env().exec_path, ExecPathMode::CurrentExe);
    }
}
