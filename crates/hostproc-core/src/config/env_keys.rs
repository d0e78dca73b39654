//! Environment variable key constants and their aliases.
//!
//! Primary keys use the `HOSTPROC_*` prefix; aliases are consulted in order
//! when the primary key is unset.

/// Host state projected into the guest `process` object.
pub mod host {
    /// Temporary directory reported to guests as `TMPDIR` / `TMP` / `TEMP`.
    pub const HOSTPROC_TEMP_DIR: &str = "HOSTPROC_TEMP_DIR";
    pub const TEMP_DIR_ALIASES: &[&str] = &["TMPDIR"];

    /// Source for `process.execPath`: `cwd` (default) or `exe`.
    pub const HOSTPROC_EXEC_PATH: &str = "HOSTPROC_EXEC_PATH";
}

/// Observability and logging.
pub mod observability {
    pub const HOSTPROC_QUIET: &str = "HOSTPROC_QUIET";
    pub const QUIET_ALIASES: &[&str] = &[];

    pub const HOSTPROC_LOG_LEVEL: &str = "HOSTPROC_LOG_LEVEL";
    pub const LOG_LEVEL_ALIASES: &[&str] = &[];

    pub const HOSTPROC_LOG_JSON: &str = "HOSTPROC_LOG_JSON";
    pub const LOG_JSON_ALIASES: &[&str] = &[];

    /// JSONL file receiving one record per guest `process` installation.
    pub const HOSTPROC_AUDIT_LOG: &str = "HOSTPROC_AUDIT_LOG";
    pub const AUDIT_LOG_ALIASES: &[&str] = &[];
}
