//! Build the guest environment snapshot from host variables.

use std::collections::BTreeMap;

use crate::env::snapshot::EnvironmentSnapshot;
use crate::host::HostContext;

/// Temp directory used when the host designates none.
pub const DEFAULT_TEMP_DIR: &str = "/tmp";

/// Keys always forced to the resolved temp directory.
pub const TEMP_DIR_KEYS: [&str; 3] = ["TMPDIR", "TMP", "TEMP"];

/// Replace every `.` and `/` in a variable name with `_`.
pub fn sanitize_key(key: &str) -> String {
    key.replace(['.', '/'], "_")
}

/// The host's temp directory, or [`DEFAULT_TEMP_DIR`] when unset or empty.
pub fn resolve_temp_dir(host: &dyn HostContext) -> String {
    host.temp_dir()
        .filter(|dir| !dir.is_empty())
        .unwrap_or_else(|| DEFAULT_TEMP_DIR.to_string())
}

/// Read the host environment once and produce the guest snapshot.
///
/// Keys are sanitized with [`sanitize_key`]; when two host keys sanitize to
/// the same name the one enumerated last wins. `TMPDIR`, `TMP` and `TEMP`
/// are then set to the resolved temp directory, replacing any host value.
pub fn build_environment_snapshot(host: &dyn HostContext) -> EnvironmentSnapshot {
    let mut vars = BTreeMap::new();
    for (key, value) in host.env_vars() {
        let sanitized = sanitize_key(&key);
        if let Some(previous) = vars.insert(sanitized.clone(), value) {
            tracing::debug!(
                key = %key,
                sanitized = %sanitized,
                replaced_len = previous.len(),
                "environment key collision, last value kept"
            );
        }
    }

    let temp_dir = resolve_temp_dir(host);
    for key in TEMP_DIR_KEYS {
        vars.insert(key.to_string(), temp_dir.clone());
    }

    tracing::debug!(count = vars.len(), temp_dir = %temp_dir, "environment snapshot built");
    EnvironmentSnapshot::from_map(vars)
}
