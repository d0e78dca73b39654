//! Native-capability lookup behind `process.binding(name)`.
//!
//! What a binding resolves to is the embedder's business; this crate only
//! forwards the lookup and maps a miss to `null`.

use std::collections::BTreeMap;

use crate::value::GuestValue;

pub trait BindingResolver: Send + Sync {
    /// Resolve a named native binding. `None` means unknown.
    fn resolve(&self, name: &str) -> Option<GuestValue>;
}

/// Resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBindings;

impl BindingResolver for NoBindings {
    fn resolve(&self, _name: &str) -> Option<GuestValue> {
        None
    }
}

/// A fixed name → value table.
#[derive(Debug, Clone, Default)]
pub struct StaticBindings {
    entries: BTreeMap<String, GuestValue>,
}

impl StaticBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: GuestValue) -> Self {
        self.entries.insert(name.into(), value);
        self
    }
}

impl BindingResolver for StaticBindings {
    fn resolve(&self, name: &str) -> Option<GuestValue> {
        self.entries.get(name).cloned()
    }
}
