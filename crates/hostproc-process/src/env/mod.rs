//! Guest environment: a point-in-time copy of the host's variables.
//!
//! `builder` reads the host once through a `HostContext` and sanitizes keys;
//! `snapshot` holds the immutable result. The real host environment is never
//! modified.

pub mod builder;
pub mod snapshot;

pub use builder::{build_environment_snapshot, resolve_temp_dir, sanitize_key};
pub use snapshot::EnvironmentSnapshot;
