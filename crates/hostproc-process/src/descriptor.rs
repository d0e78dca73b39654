//! The guest-visible `process` descriptor.
//!
//! [`ProcessDescriptor`] is built once per guest runtime and never changes
//! afterwards. The Rust struct only exposes getters; its guest projection
//! ([`ProcessDescriptor::to_guest_object`]) defines every property as
//! non-writable, non-enumerable and non-configurable. The one live value is
//! `cwd`, a function that re-reads the host working directory on each call.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use hostproc_core::config::{ExecPathMode, HostConfig};
use hostproc_core::observability;
use serde::Serialize;

use crate::binding::{BindingResolver, NoBindings};
use crate::env::{build_environment_snapshot, EnvironmentSnapshot};
use crate::error::Result;
use crate::host::{HostContext, SystemHost};
use crate::info_log;
use crate::value::{GuestArray, GuestObject, GuestValue, NativeFunction, PropertyDescriptor};

/// Runtime version the guest believes it is running on.
pub const EMULATED_VERSION: &str = "v0.10.18";

/// Names present on `process` for API compatibility but without behavior.
pub const UNIMPLEMENTED_SLOTS: [&str; 22] = [
    "execArgv",
    "features",
    "_eval",
    "_print_eval",
    "_forceRepl",
    "debugPort",
    "_needTickCallback",
    "reallyExit",
    "abort",
    "chdir",
    "umask",
    "getuid",
    "setuid",
    "getgid",
    "setgid",
    "_kill",
    "_debugProcess",
    "_debugPause",
    "_debugEnd",
    "hrtime",
    "dlopen",
    "uptime",
];

/// Content of an unimplemented slot. Guests see `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Slot {
    NotImplemented,
}

/// Read the host working directory; `"."` when it cannot be read.
fn read_cwd(host: &dyn HostContext) -> String {
    host.current_dir().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "working directory unreadable, reporting \".\"");
        ".".to_string()
    })
}

/// Options for [`ProcessDescriptor`] construction.
pub struct ProcessDescriptorBuilder {
    args: Vec<String>,
    host: Option<Arc<dyn HostContext>>,
    exec_path: Option<ExecPathMode>,
    binding: Option<Arc<dyn BindingResolver>>,
}

impl ProcessDescriptorBuilder {
    /// Host to read from. Defaults to the real system configured through
    /// [`HostConfig::from_env`].
    pub fn host(mut self, host: Arc<dyn HostContext>) -> Self {
        self.host = Some(host);
        self
    }

    /// Overrides `HOSTPROC_EXEC_PATH`. With an explicit host and no mode,
    /// the working directory is used.
    pub fn exec_path(mut self, mode: ExecPathMode) -> Self {
        self.exec_path = Some(mode);
        self
    }

    /// Resolver behind `process.binding`. Defaults to [`NoBindings`].
    pub fn binding(mut self, resolver: Arc<dyn BindingResolver>) -> Self {
        self.binding = Some(resolver);
        self
    }

    pub fn build(self) -> ProcessDescriptor {
        let (host, configured_mode): (Arc<dyn HostContext>, ExecPathMode) = match self.host {
            Some(host) => (host, ExecPathMode::default()),
            None => {
                let config = HostConfig::from_env();
                (Arc::new(SystemHost::from_config(&config)), config.exec_path)
            }
        };
        let binding = self
            .binding
            .unwrap_or_else(|| Arc::new(NoBindings) as Arc<dyn BindingResolver>);

        let env = build_environment_snapshot(host.as_ref());
        let exec_path = match self.exec_path.unwrap_or(configured_mode) {
            ExecPathMode::WorkingDirectory => read_cwd(host.as_ref()),
            ExecPathMode::CurrentExe => host
                .current_exe()
                .unwrap_or_else(|_| read_cwd(host.as_ref())),
        };
        let pid = host.identity();
        let versions = host.versions();

        info_log!(
            pid = %pid,
            argc = self.args.len(),
            env_count = env.len(),
            "built process descriptor"
        );
        observability::audit_descriptor_built(&pid, self.args.len(), env.len());

        ProcessDescriptor {
            argv: self.args,
            versions,
            env,
            pid,
            exec_path,
            module_load_list: GuestArray::new(),
            binding,
            host,
        }
    }
}

/// The host process as seen by a guest script.
pub struct ProcessDescriptor {
    argv: Vec<String>,
    versions: BTreeMap<String, String>,
    env: EnvironmentSnapshot,
    pid: String,
    exec_path: String,
    module_load_list: GuestArray,
    binding: Arc<dyn BindingResolver>,
    host: Arc<dyn HostContext>,
}

/// Build a descriptor for `args` against `host` with default options.
pub fn build_process_descriptor<I, S>(args: I, host: Arc<dyn HostContext>) -> ProcessDescriptor
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ProcessDescriptor::builder(args).host(host).build()
}

impl ProcessDescriptor {
    pub fn builder<I, S>(args: I) -> ProcessDescriptorBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ProcessDescriptorBuilder {
            args: args.into_iter().map(Into::into).collect(),
            host: None,
            exec_path: None,
            binding: None,
        }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn version(&self) -> &'static str {
        EMULATED_VERSION
    }

    pub fn versions(&self) -> &BTreeMap<String, String> {
        &self.versions
    }

    pub fn env(&self) -> &EnvironmentSnapshot {
        &self.env
    }

    pub fn pid(&self) -> &str {
        &self.pid
    }

    /// Captured once at construction; see [`ExecPathMode`].
    pub fn exec_path(&self) -> &str {
        &self.exec_path
    }

    /// Shared with the guest; the host may append module names.
    pub fn module_load_list(&self) -> &GuestArray {
        &self.module_load_list
    }

    /// Current host working directory, read now.
    pub fn cwd(&self) -> String {
        read_cwd(self.host.as_ref())
    }

    /// `process.binding(name)`.
    pub fn binding(&self, name: &str) -> Option<GuestValue> {
        self.binding.resolve(name)
    }

    /// Placeholder content for an unimplemented slot, `None` for other names.
    pub fn slot(&self, name: &str) -> Option<Slot> {
        UNIMPLEMENTED_SLOTS
            .contains(&name)
            .then_some(Slot::NotImplemented)
    }

    pub fn unimplemented_slots(&self) -> &'static [&'static str] {
        &UNIMPLEMENTED_SLOTS
    }

    /// Project into a guest object. Every property is frozen and hidden from
    /// enumeration; `cwd` and `binding` are native functions.
    pub fn to_guest_object(&self) -> GuestObject {
        let obj = GuestObject::new();
        let define = |name: &str, value: GuestValue| {
            obj.define_own_property(name, PropertyDescriptor::frozen(value));
        };

        define("argv", GuestValue::Array(GuestArray::from_strings(self.argv.iter().cloned())));
        define("version", EMULATED_VERSION.into());
        define("versions", GuestValue::Object(versions_object(&self.versions)));
        define("env", GuestValue::Object(self.env.to_guest_object()));
        define("pid", self.pid.clone().into());
        define("execPath", self.exec_path.clone().into());
        define("moduleLoadList", GuestValue::Array(self.module_load_list.clone()));
        for name in UNIMPLEMENTED_SLOTS {
            define(name, GuestValue::Null);
        }

        let resolver = Arc::clone(&self.binding);
        define(
            "binding",
            GuestValue::Function(NativeFunction::new("binding", move |args| {
                args.first()
                    .and_then(GuestValue::as_str)
                    .and_then(|name| resolver.resolve(name))
                    .unwrap_or(GuestValue::Null)
            })),
        );

        let host = Arc::clone(&self.host);
        define(
            "cwd",
            GuestValue::Function(NativeFunction::new("cwd", move |_| {
                GuestValue::String(read_cwd(host.as_ref()))
            })),
        );

        obj
    }

    /// Serializable summary, including each guest property's flags.
    pub fn report(&self) -> DescriptorReport {
        let properties = self
            .to_guest_object()
            .own_properties()
            .into_iter()
            .map(|(name, desc)| PropertyReport {
                name,
                kind: desc.value.type_name(),
                writable: desc.flags.writable,
                enumerable: desc.flags.enumerable,
                configurable: desc.flags.configurable,
            })
            .collect();
        DescriptorReport {
            argv: self.argv.clone(),
            version: EMULATED_VERSION,
            versions: self.versions.clone(),
            env: self.env.clone(),
            pid: self.pid.clone(),
            exec_path: self.exec_path.clone(),
            cwd: self.cwd(),
            module_load_list: self.module_load_list.strings(),
            unimplemented: UNIMPLEMENTED_SLOTS.to_vec(),
            properties,
        }
    }

    /// Write [`Self::report`] as pretty JSON.
    pub fn write_report<W: Write>(&self, mut out: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut out, &self.report())?;
        writeln!(out)?;
        Ok(())
    }
}

impl std::fmt::Debug for ProcessDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessDescriptor")
            .field("argv", &self.argv)
            .field("version", &EMULATED_VERSION)
            .field("pid", &self.pid)
            .field("exec_path", &self.exec_path)
            .field("env_count", &self.env.len())
            .finish_non_exhaustive()
    }
}

fn versions_object(versions: &BTreeMap<String, String>) -> GuestObject {
    let obj = GuestObject::new();
    for (component, version) in versions {
        obj.define_own_property(
            component,
            PropertyDescriptor::new(version.as_str(), crate::value::PropertyFlags::READ_ONLY),
        );
    }
    obj
}

/// One guest property and its flags.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyReport {
    pub name: String,
    pub kind: &'static str,
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}

/// Serializable view of a [`ProcessDescriptor`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorReport {
    pub argv: Vec<String>,
    pub version: &'static str,
    pub versions: BTreeMap<String, String>,
    pub env: EnvironmentSnapshot,
    pub pid: String,
    pub exec_path: String,
    pub cwd: String,
    pub module_load_list: Vec<String>,
    pub unimplemented: Vec<&'static str>,
    pub properties: Vec<PropertyReport>,
}
