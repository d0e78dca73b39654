//! `hostproc slots`: list the placeholder capabilities on `process`.

use std::io::{self, Write};

use anyhow::Result;
use hostproc_process::UNIMPLEMENTED_SLOTS;

pub fn cmd_slots() -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for name in UNIMPLEMENTED_SLOTS {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}
