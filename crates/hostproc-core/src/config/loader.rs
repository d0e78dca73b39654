//! Environment variable loading helpers.
//!
//! Settings resolve as: process environment, then `.env` files, then the
//! caller's default. `.env` values are held in a private table and never
//! written into the process environment, so the guest `process.env` only
//! ever reflects the real host.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Parse `.env` content into key/value pairs.
///
/// Blank lines and `#` comments are skipped. Values may be wrapped in single
/// or double quotes; an unquoted value loses any trailing `# comment`.
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, raw)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        pairs.push((key.to_string(), unquote(raw.trim()).to_string()));
    }
    pairs
}

fn strip_quotes(value: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|q| {
        (value.len() >= 2 && value.starts_with(q) && value.ends_with(q))
            .then(|| &value[1..value.len() - 1])
    })
}

fn unquote(value: &str) -> &str {
    if let Some(inner) = strip_quotes(value) {
        return inner;
    }
    let value = value.find('#').map_or(value, |hash| value[..hash].trim_end());
    strip_quotes(value).unwrap_or(value)
}

/// Read `<dir>/.env`. A missing or unreadable file yields no pairs.
pub fn load_dotenv_from_dir(dir: &Path) -> Vec<(String, String)> {
    let path = dir.join(".env");
    let Ok(content) = std::fs::read_to_string(&path) else {
        return Vec::new();
    };
    let pairs = parse_dotenv(&content);
    tracing::debug!(path = %path.display(), count = pairs.len(), "read .env");
    pairs
}

/// `.env` settings from the current directory, then the user config
/// directory (`~/.config/hostproc/.env`). The first file to define a key
/// wins. Read once per process.
pub fn load_dotenv() -> &'static BTreeMap<String, String> {
    static DOTENV: OnceLock<BTreeMap<String, String>> = OnceLock::new();
    DOTENV.get_or_init(|| {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut dirs_to_read = vec![cwd];
        dirs_to_read.extend(dirs::config_dir().map(|d| d.join("hostproc")));

        let mut table = BTreeMap::new();
        for dir in dirs_to_read {
            for (key, value) in load_dotenv_from_dir(&dir) {
                table.entry(key).or_insert(value);
            }
        }
        table
    })
}

/// One key: the process environment first, then `.env`.
fn lookup(key: &str) -> Option<String> {
    env::var(key).ok().or_else(|| load_dotenv().get(key).cloned())
}

/// The primary key, else the first alias that is set.
fn lookup_chain(primary: &str, aliases: &[&str]) -> Option<String> {
    std::iter::once(primary)
        .chain(aliases.iter().copied())
        .find_map(lookup)
}

/// Read the primary key or the first set alias; fall back to `default`.
/// Empty values count as unset.
pub fn env_or<F>(primary: &str, aliases: &[&str], default: F) -> String
where
    F: FnOnce() -> String,
{
    lookup_chain(primary, aliases)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default)
}

/// Like [`env_or`] without a default; whitespace-only values are `None`.
pub fn env_optional(primary: &str, aliases: &[&str]) -> Option<String> {
    lookup_chain(primary, aliases)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `0`/`false`/`no`/`off` are false, anything else that is set is true.
pub fn env_bool(primary: &str, aliases: &[&str], default: bool) -> bool {
    lookup_chain(primary, aliases).map_or(default, |s| {
        !matches!(s.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off")
    })
}

// Process-environment writes. Only tests and embedders preparing a host
// before spawning threads should call these; hostproc itself never does.

/// Set a single environment variable.
#[allow(unsafe_code, unused_unsafe)]
pub fn set_env_var(key: &str, value: impl AsRef<std::ffi::OsStr>) {
    unsafe { env::set_var(key, value) };
}

/// Remove a single environment variable.
#[allow(unsafe_code, unused_unsafe)]
pub fn remove_env_var(key: &str) {
    unsafe { env::remove_var(key) };
}

/// RAII guard: removes the variable through [`remove_env_var`] on drop.
pub struct ScopedEnvGuard(pub &'static str);

impl Drop for ScopedEnvGuard {
    fn drop(&mut self) {
        remove_env_var(self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotenv_quotes_and_comments() {
        let content = "# header\n\nA=1\nB = \"two words\"\nC='x' \nD=plain # trailing\nexport E=5\nNOEQ\n";
        let pairs = parse_dotenv(content);
        assert_eq!(
            pairs,
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "two words".to_string()),
                ("C".to_string(), "x".to_string()),
                ("D".to_string(), "plain".to_string()),
                ("E".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_dotenv_keeps_hash_inside_quotes() {
        let pairs = parse_dotenv("K=\"a#b\"\n");
        assert_eq!(pairs, vec![("K".to_string(), "a#b".to_string())]);
    }

    #[test]
    fn test_env_or_alias_and_default() {
        set_env_var("HOSTPROC_TEST_ENV_OR_ALIAS", "from-alias");
        let _g = ScopedEnvGuard("HOSTPROC_TEST_ENV_OR_ALIAS");
        let v = env_or(
            "HOSTPROC_TEST_ENV_OR_PRIMARY_UNSET",
            &["HOSTPROC_TEST_ENV_OR_ALIAS"],
            || "default".to_string(),
        );
        assert_eq!(v, "from-alias");

        let v = env_or("HOSTPROC_TEST_ENV_OR_NOTHING", &[], || "default".to_string());
        assert_eq!(v, "default");
    }

    #[test]
    fn test_env_optional_blank_is_none() {
        set_env_var("HOSTPROC_TEST_ENV_OPTIONAL_BLANK", "   ");
        let _g = ScopedEnvGuard("HOSTPROC_TEST_ENV_OPTIONAL_BLANK");
        assert_eq!(env_optional("HOSTPROC_TEST_ENV_OPTIONAL_BLANK", &[]), None);
    }

    #[test]
    fn test_env_bool_values() {
        set_env_var("HOSTPROC_TEST_ENV_BOOL", "off");
        let _g = ScopedEnvGuard("HOSTPROC_TEST_ENV_BOOL");
        assert!(!env_bool("HOSTPROC_TEST_ENV_BOOL", &[], true));
        set_env_var("HOSTPROC_TEST_ENV_BOOL", "yes");
        assert!(env_bool("HOSTPROC_TEST_ENV_BOOL", &[], false));
        assert!(env_bool("HOSTPROC_TEST_ENV_BOOL_UNSET", &[], true));
    }

    #[test]
    fn test_load_dotenv_from_dir_leaves_process_env_alone() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "HOSTPROC_TEST_DOTENV_ONLY_FILE=fresh\n",
        )
        .unwrap();

        let pairs = load_dotenv_from_dir(dir.path());
        assert_eq!(
            pairs,
            vec![("HOSTPROC_TEST_DOTENV_ONLY_FILE".to_string(), "fresh".to_string())]
        );
        assert!(env::var_os("HOSTPROC_TEST_DOTENV_ONLY_FILE").is_none());
    }

    #[test]
    fn test_load_dotenv_from_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_dotenv_from_dir(&dir.path().join("missing")).is_empty());
    }
}
