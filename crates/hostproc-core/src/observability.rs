//! Observability: tracing init and the JSONL audit log.
//!
//! Uses `config::ObservabilityConfig` for HOSTPROC_QUIET, HOSTPROC_LOG_LEVEL,
//! HOSTPROC_LOG_JSON and HOSTPROC_AUDIT_LOG.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use serde_json::json;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Initialize tracing. Call once at process startup.
/// When HOSTPROC_QUIET=1 only WARN and above are logged.
pub fn init_tracing() {
    let cfg = crate::config::ObservabilityConfig::from_env();
    let level: String = if cfg.quiet {
        "hostproc=warn".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    // Logs go to stderr so `inspect --json` output stays parseable.
    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}

/// Configured audit log path, with its parent directory created.
fn audit_path() -> Option<&'static Path> {
    let path = Path::new(crate::config::ObservabilityConfig::from_env().audit_log.as_deref()?);
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    Some(path)
}

fn append_jsonl(path: &Path, record: &serde_json::Value) {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(mut f) => {
            if let Ok(line) = serde_json::to_string(record) {
                let _ = writeln!(f, "{}", line);
            }
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "audit log not writable");
        }
    }
}

fn descriptor_built_record(pid: &str, argc: usize, env_count: usize) -> serde_json::Value {
    json!({
        "ts": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "event": "descriptor_built",
        "pid": pid,
        "argc": argc,
        "env_count": env_count,
    })
}

fn process_installed_record(global_name: &str, pid: &str) -> serde_json::Value {
    json!({
        "ts": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "event": "process_installed",
        "global": global_name,
        "pid": pid,
    })
}

/// Audit: a guest process descriptor was constructed.
pub fn audit_descriptor_built(pid: &str, argc: usize, env_count: usize) {
    if let Some(path) = audit_path() {
        append_jsonl(path, &descriptor_built_record(pid, argc, env_count));
    }
}

/// Audit: a descriptor was installed into a guest global namespace.
pub fn audit_process_installed(global_name: &str, pid: &str) {
    tracing::info!(global = %global_name, pid = %pid, "process descriptor installed");
    if let Some(path) = audit_path() {
        append_jsonl(path, &process_installed_record(global_name, pid));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_jsonl_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        append_jsonl(&path, &descriptor_built_record("42@box", 2, 7));
        append_jsonl(&path, &process_installed_record("process", "42@box"));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "descriptor_built");
        assert_eq!(first["argc"], 2);
        assert_eq!(first["env_count"], 7);
        assert!(first["ts"].as_str().unwrap().ends_with('Z'));

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "process_installed");
        assert_eq!(second["global"], "process");
    }

    #[test]
    fn test_append_jsonl_unwritable_path_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for append; must not panic.
        append_jsonl(dir.path(), &descriptor_built_record("1@h", 0, 0));
    }
}
