//! Immutable sanitized environment.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::value::{GuestObject, PropertyDescriptor, PropertyFlags};

/// Sanitized variable name → value, fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvironmentSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvironmentSnapshot {
    pub(crate) fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    /// Guest `process.env`: every entry read-only but enumerable, so scripts
    /// can still walk `Object.keys(process.env)`.
    pub fn to_guest_object(&self) -> GuestObject {
        let obj = GuestObject::new();
        for (k, v) in &self.vars {
            obj.define_own_property(
                k,
                PropertyDescriptor::new(v.as_str(), PropertyFlags::READ_ONLY),
            );
        }
        obj
    }
}
