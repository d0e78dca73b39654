//! CLI commands. Each builds against the real host through
//! `hostproc_process::SystemHost` and writes to stdout.

pub mod env;
pub mod inspect;
pub mod slots;
