//! Host context: the capability through which the descriptor reads host state.
//!
//! The descriptor never touches ambient globals directly. [`SystemHost`]
//! reads the real operating system; [`StaticHost`] serves fixed values for
//! embedders that want a synthetic guest environment (and for tests).

use std::collections::BTreeMap;
use std::io;
use std::sync::RwLock;

use hostproc_core::config::HostConfig;

use crate::descriptor::EMULATED_VERSION;

/// Host state the process descriptor depends on.
pub trait HostContext: Send + Sync {
    /// All environment variables, in host enumeration order.
    fn env_vars(&self) -> Vec<(String, String)>;

    /// Designated temporary directory, if the host has one.
    fn temp_dir(&self) -> Option<String>;

    /// Current working directory, read at call time.
    fn current_dir(&self) -> io::Result<String>;

    /// Path of the running host executable.
    fn current_exe(&self) -> io::Result<String>;

    /// Self-reported runtime identity. Not necessarily a numeric pid.
    fn identity(&self) -> String;

    /// Component → version metadata exposed as `process.versions`.
    fn versions(&self) -> BTreeMap<String, String> {
        default_versions()
    }
}

/// Versions reported when the host has nothing more specific.
pub fn default_versions() -> BTreeMap<String, String> {
    let mut versions = BTreeMap::new();
    versions.insert(
        "node".to_string(),
        EMULATED_VERSION.trim_start_matches('v').to_string(),
    );
    versions.insert("hostproc".to_string(), env!("CARGO_PKG_VERSION").to_string());
    versions
}

/// The real host process.
#[derive(Debug, Clone, Default)]
pub struct SystemHost {
    temp_dir: Option<String>,
}

impl SystemHost {
    /// Host settings from `HOSTPROC_*` / `.env`.
    pub fn from_env() -> Self {
        Self::from_config(&HostConfig::from_env())
    }

    pub fn from_config(config: &HostConfig) -> Self {
        Self {
            temp_dir: config.temp_dir.clone(),
        }
    }
}

impl HostContext for SystemHost {
    fn env_vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    fn temp_dir(&self) -> Option<String> {
        self.temp_dir.clone()
    }

    fn current_dir(&self) -> io::Result<String> {
        std::env::current_dir().map(|p| p.to_string_lossy().into_owned())
    }

    fn current_exe(&self) -> io::Result<String> {
        std::env::current_exe().map(|p| p.to_string_lossy().into_owned())
    }

    fn identity(&self) -> String {
        format!("{}@{}", std::process::id(), hostname())
    }
}

#[cfg(unix)]
fn hostname() -> String {
    nix::unistd::gethostname()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(not(unix))]
fn hostname() -> String {
    std::env::var("COMPUTERNAME")
        .ok()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

/// A host with fixed values. The working directory can be moved with
/// [`StaticHost::set_current_dir`] to emulate `chdir` on the host side.
#[derive(Debug)]
pub struct StaticHost {
    env: Vec<(String, String)>,
    temp_dir: Option<String>,
    cwd: RwLock<Option<String>>,
    exe: Option<String>,
    identity: String,
    versions: BTreeMap<String, String>,
}

impl Default for StaticHost {
    fn default() -> Self {
        Self {
            env: Vec::new(),
            temp_dir: None,
            cwd: RwLock::new(Some("/".to_string())),
            exe: None,
            identity: "0@localhost".to_string(),
            versions: default_versions(),
        }
    }
}

impl StaticHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variable; later duplicates of a key win.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<String>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn with_current_dir(self, dir: impl Into<String>) -> Self {
        self.set_current_dir(Some(dir.into()));
        self
    }

    pub fn with_exe(mut self, exe: impl Into<String>) -> Self {
        self.exe = Some(exe.into());
        self
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    pub fn with_version(mut self, component: impl Into<String>, version: impl Into<String>) -> Self {
        self.versions.insert(component.into(), version.into());
        self
    }

    /// Move the working directory; `None` makes it unreadable.
    pub fn set_current_dir(&self, dir: Option<String>) {
        let mut cwd = self.cwd.write().unwrap_or_else(|poison| poison.into_inner());
        *cwd = dir;
    }
}

impl HostContext for StaticHost {
    fn env_vars(&self) -> Vec<(String, String)> {
        self.env.clone()
    }

    fn temp_dir(&self) -> Option<String> {
        self.temp_dir.clone()
    }

    fn current_dir(&self) -> io::Result<String> {
        let cwd = self.cwd.read().unwrap_or_else(|poison| poison.into_inner());
        cwd.clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "working directory removed"))
    }

    fn current_exe(&self) -> io::Result<String> {
        self.exe
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no executable path"))
    }

    fn identity(&self) -> String {
        self.identity.clone()
    }

    fn versions(&self) -> BTreeMap<String, String> {
        self.versions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_versions_include_node() {
        let v = default_versions();
        assert_eq!(v.get("node").map(String::as_str), Some("0.10.18"));
        assert!(v.contains_key("hostproc"));
    }

    #[test]
    fn test_system_identity_starts_with_pid() {
        let id = SystemHost::default().identity();
        let (pid, host) = id.split_once('@').unwrap();
        assert_eq!(pid, std::process::id().to_string());
        assert!(!host.is_empty());
    }

    #[test]
    fn test_system_host_uses_configured_temp_dir() {
        let host = SystemHost::from_config(&HostConfig {
            temp_dir: Some("/var/tmp".to_string()),
            ..Default::default()
        });
        assert_eq!(host.temp_dir().as_deref(), Some("/var/tmp"));
        assert_eq!(SystemHost::default().temp_dir(), None);
    }

    #[test]
    fn test_system_host_reads_env() {
        let _guard = crate::test_support::serial_guard();
        hostproc_core::config::set_env_var("HOSTPROC_TEST_HOST_ENV", "present");
        let _env = hostproc_core::config::ScopedEnvGuard("HOSTPROC_TEST_HOST_ENV");
        let vars = SystemHost::default().env_vars();
        assert!(vars
            .iter()
            .any(|(k, v)| k == "HOSTPROC_TEST_HOST_ENV" && v == "present"));
    }

    #[test]
    fn test_static_host_cwd_moves() {
        let host = StaticHost::new().with_current_dir("/srv/a");
        assert_eq!(host.current_dir().unwrap(), "/srv/a");
        host.set_current_dir(Some("/srv/b".to_string()));
        assert_eq!(host.current_dir().unwrap(), "/srv/b");
        host.set_current_dir(None);
        assert!(host.current_dir().is_err());
    }

    #[test]
    fn test_static_host_builder() {
        let host = StaticHost::new()
            .with_env("A", "1")
            .with_identity("7@guest")
            .with_version("v8", "3.14.5.9")
            .with_exe("/usr/bin/hostproc");
        assert_eq!(host.env_vars(), vec![("A".to_string(), "1".to_string())]);
        assert_eq!(host.identity(), "7@guest");
        assert_eq!(host.versions().get("v8").map(String::as_str), Some("3.14.5.9"));
        assert_eq!(host.current_exe().unwrap(), "/usr/bin/hostproc");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_host_non_utf8_value_is_lossy() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let _guard = crate::test_support::serial_guard();
        hostproc_core::config::set_env_var("HOSTPROC_TEST_NON_UTF8", OsStr::from_bytes(b"a\xffb"));
        let _env = hostproc_core::config::ScopedEnvGuard("HOSTPROC_TEST_NON_UTF8");

        let snapshot = crate::env::build_environment_snapshot(&SystemHost::default());
        assert_eq!(snapshot.get("HOSTPROC_TEST_NON_UTF8"), Some("a\u{FFFD}b"));
    }
}
