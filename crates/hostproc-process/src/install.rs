//! Install the descriptor into a guest global namespace.

use hostproc_core::observability;

use crate::descriptor::ProcessDescriptor;
use crate::error::{ProcessError, Result};
use crate::value::{GuestObject, GuestValue, PropertyDescriptor};

/// Well-known global under which guests find the descriptor.
pub const PROCESS_GLOBAL: &str = "process";

/// Define `process` on `global` and return the installed guest object.
///
/// Must run before any guest script executes. The global binding itself is
/// frozen, so a second installation into the same namespace fails with
/// [`ProcessError::AlreadyInstalled`].
pub fn install_process(global: &GuestObject, descriptor: &ProcessDescriptor) -> Result<GuestObject> {
    if global
        .get_own_property(PROCESS_GLOBAL)
        .is_some_and(|d| !d.flags.configurable)
    {
        return Err(ProcessError::AlreadyInstalled {
            name: PROCESS_GLOBAL.to_string(),
        });
    }

    let process = descriptor.to_guest_object();
    let defined = global.define_own_property(
        PROCESS_GLOBAL,
        PropertyDescriptor::frozen(GuestValue::Object(process.clone())),
    );
    if !defined {
        return Err(ProcessError::AlreadyInstalled {
            name: PROCESS_GLOBAL.to_string(),
        });
    }

    observability::audit_process_installed(PROCESS_GLOBAL, descriptor.pid());
    Ok(process)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::build_process_descriptor;
    use crate::host::StaticHost;
    use std::sync::Arc;

    fn descriptor() -> ProcessDescriptor {
        build_process_descriptor(["app.js"], Arc::new(StaticHost::new()))
    }

    #[test]
    fn test_install_defines_frozen_global() {
        let global = GuestObject::new();
        let d = descriptor();
        let process = install_process(&global, &d).unwrap();

        let installed = global.get(PROCESS_GLOBAL);
        assert!(installed.as_object().unwrap().ptr_eq(&process));
        assert!(!global.put(PROCESS_GLOBAL, GuestValue::Null));
        assert!(!global.delete(PROCESS_GLOBAL));
        assert!(global.own_keys().is_empty());
    }

    #[test]
    fn test_second_install_fails() {
        let global = GuestObject::new();
        let d = descriptor();
        install_process(&global, &d).unwrap();
        let err = install_process(&global, &d).unwrap_err();
        assert!(matches!(err, ProcessError::AlreadyInstalled { ref name } if name == "process"));
    }

    #[test]
    fn test_install_replaces_configurable_placeholder() {
        let global = GuestObject::new();
        global.put(PROCESS_GLOBAL, GuestValue::Null);
        let process = install_process(&global, &descriptor()).unwrap();
        assert!(global.get(PROCESS_GLOBAL).as_object().unwrap().ptr_eq(&process));
    }

    #[test]
    fn test_guest_reads_through_global() {
        let global = GuestObject::new();
        install_process(&global, &descriptor()).unwrap();
        let process = global.get(PROCESS_GLOBAL);
        let argv = process.as_object().unwrap().get("argv");
        assert_eq!(argv.as_array().unwrap().strings(), vec!["app.js"]);
        let env = process.as_object().unwrap().get("env");
        assert_eq!(env.as_object().unwrap().get("TMPDIR").as_str(), Some("/tmp"));
    }
}
