//! hostproc-process: the guest-visible `process` object.
//!
//! Builds a Node-style `process` descriptor from host state and installs it
//! into a guest script runtime's global namespace:
//!
//! - **host**: `HostContext` capability (real OS or a fixed, injectable host)
//! - **env**: environment snapshot with key sanitization and forced temp keys
//! - **value**: guest values and objects with per-property flags
//! - **binding**: native-capability lookup collaborator
//! - **descriptor**: the frozen `ProcessDescriptor` and its guest projection
//! - **install**: installation into the guest global namespace
//!
//! # Example
//!
//! ```ignore
//! use hostproc_process::{install_process, GuestObject, ProcessDescriptor};
//!
//! let descriptor = ProcessDescriptor::builder(["script.js"]).build();
//! let global = GuestObject::new();
//! install_process(&global, &descriptor)?;
//! ```

pub mod binding;
pub mod descriptor;
pub mod env;
pub mod error;
pub mod host;
pub mod install;
pub mod log;
pub mod value;

pub use binding::{BindingResolver, NoBindings, StaticBindings};
pub use descriptor::{
    build_process_descriptor, DescriptorReport, ProcessDescriptor, ProcessDescriptorBuilder, Slot,
    EMULATED_VERSION, UNIMPLEMENTED_SLOTS,
};
pub use env::{build_environment_snapshot, sanitize_key, EnvironmentSnapshot};
pub use error::{ProcessError, Result};
pub use host::{HostContext, StaticHost, SystemHost};
pub use hostproc_core::config::ExecPathMode;
pub use install::{install_process, PROCESS_GLOBAL};
pub use value::{GuestArray, GuestObject, GuestValue, NativeFunction, PropertyDescriptor, PropertyFlags};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    /// Serializes tests that touch process-global state (cwd, env).
    pub fn serial_guard() -> MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}
