//! Unified configuration layer.
//!
//! Every read of hostproc's own settings goes through this module; callers use
//! the structured configs instead of calling `std::env::var` directly.
//!
//! - `loader`: `env_or`, `env_optional`, `env_bool`, `.env` loading
//! - `schema`: `HostConfig`, `ObservabilityConfig`
//! - `env_keys`: key constants and aliases

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{
    env_bool, env_optional, env_or, load_dotenv, load_dotenv_from_dir, parse_dotenv,
    remove_env_var, set_env_var, ScopedEnvGuard,
};
pub use schema::{ExecPathMode, HostConfig, ObservabilityConfig};
