//! hostproc-core: configuration and observability shared by the hostproc crates.

pub mod config;
pub mod observability;
