//! `hostproc inspect`: build and install a descriptor, then print it.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use hostproc_core::config::{ExecPathMode, HostConfig};
use hostproc_process::{install_process, DescriptorReport, GuestObject, ProcessDescriptor, SystemHost};

/// `hostproc inspect [--json] [--exec-path MODE] [ARGS...]`
pub fn cmd_inspect(args: Vec<String>, exec_path: Option<&str>, json: bool) -> Result<()> {
    let config = HostConfig::from_env();
    let mode = match exec_path {
        Some(raw) => ExecPathMode::parse(raw)
            .with_context(|| format!("Invalid --exec-path '{}': expected cwd or exe", raw))?,
        None => config.exec_path,
    };

    let descriptor = ProcessDescriptor::builder(args)
        .host(Arc::new(SystemHost::from_config(&config)))
        .exec_path(mode)
        .build();
    let global = GuestObject::new();
    install_process(&global, &descriptor).context("Install process descriptor")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        descriptor
            .write_report(&mut out)
            .context("Write descriptor report")?;
    } else {
        render_text(&descriptor.report(), &mut out).context("Write descriptor summary")?;
    }
    Ok(())
}

/// Human-readable summary: values first, then the property flag table.
pub fn render_text<W: Write>(report: &DescriptorReport, out: &mut W) -> io::Result<()> {
    writeln!(out, "version:   {}", report.version)?;
    writeln!(out, "pid:       {}", report.pid)?;
    writeln!(out, "argv:      {:?}", report.argv)?;
    writeln!(out, "execPath:  {}", report.exec_path)?;
    writeln!(out, "cwd():     {}", report.cwd)?;
    writeln!(out, "env:       {} variables", report.env.len())?;
    for (component, version) in &report.versions {
        writeln!(out, "versions.{}: {}", component, version)?;
    }
    writeln!(out)?;
    writeln!(out, "{:<20} {:<10} flags", "property", "type")?;
    for p in &report.properties {
        let flags = format!(
            "{}{}{}",
            if p.writable { "w" } else { "-" },
            if p.enumerable { "e" } else { "-" },
            if p.configurable { "c" } else { "-" },
        );
        writeln!(out, "{:<20} {:<10} {}", p.name, p.kind, flags)?;
    }
    Ok(())
}
