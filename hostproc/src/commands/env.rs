//! `hostproc env`: print the sanitized environment snapshot.

use std::io::{self, Write};

use anyhow::{Context, Result};
use hostproc_process::{build_environment_snapshot, EnvironmentSnapshot, SystemHost};

/// `hostproc env [--json]`
pub fn cmd_env(json: bool) -> Result<()> {
    let snapshot = build_environment_snapshot(&SystemHost::from_env());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_snapshot(&snapshot, json, &mut out).context("Write environment snapshot")?;
    Ok(())
}

fn write_snapshot<W: Write>(snapshot: &EnvironmentSnapshot, json: bool, out: &mut W) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, snapshot)?;
        writeln!(out)?;
    } else {
        for (key, value) in snapshot.iter() {
            writeln!(out, "{}={}", key, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostproc_process::StaticHost;

    fn snapshot() -> EnvironmentSnapshot {
        build_environment_snapshot(&StaticHost::new().with_env("MY.VAR", "1"))
    }

    #[test]
    fn test_write_snapshot_lines_sorted() {
        let mut buf = Vec::new();
        write_snapshot(&snapshot(), false, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "MY_VAR=1\nTEMP=/tmp\nTMP=/tmp\nTMPDIR=/tmp\n");
    }

    #[test]
    fn test_write_snapshot_json() {
        let mut buf = Vec::new();
        write_snapshot(&snapshot(), true, &mut buf).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["MY_VAR"], "1");
        assert_eq!(json["TMPDIR"], "/tmp");
    }
}
