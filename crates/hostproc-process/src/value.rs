//! Guest values and objects with per-property flags.
//!
//! A [`GuestObject`] is the host-side view of a script object: an ordered set
//! of named properties, each carrying `writable` / `enumerable` /
//! `configurable` flags. Writes and deletes follow non-strict script
//! semantics: a rejected operation returns `false` and leaves the object
//! unchanged.
//!
//! Arrays and objects are reference types; cloning a [`GuestValue`] shares
//! the underlying storage, the same way two script variables can refer to the
//! same object.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Signature of a host function callable from the guest.
pub type NativeFn = dyn Fn(&[GuestValue]) -> GuestValue + Send + Sync;

/// A host function exposed to the guest.
#[derive(Clone)]
pub struct NativeFunction {
    name: String,
    f: Arc<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[GuestValue]) -> GuestValue + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[GuestValue]) -> GuestValue {
        (self.f)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function: {}]", self.name)
    }
}

/// A shared, growable guest array.
#[derive(Clone, Default)]
pub struct GuestArray(Arc<RwLock<Vec<GuestValue>>>);

impl GuestArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = items
            .into_iter()
            .map(|s| GuestValue::String(s.into()))
            .collect();
        Self(Arc::new(RwLock::new(values)))
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<GuestValue>> {
        self.0.read().unwrap_or_else(|poison| poison.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<GuestValue>> {
        self.0.write().unwrap_or_else(|poison| poison.into_inner())
    }

    pub fn push(&self, value: GuestValue) {
        self.write().push(value);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the current elements.
    pub fn to_vec(&self) -> Vec<GuestValue> {
        self.read().clone()
    }

    /// String elements in order; non-string elements are skipped.
    pub fn strings(&self) -> Vec<String> {
        self.read()
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    /// Whether both handles refer to the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for GuestArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.read().iter()).finish()
    }
}

/// A dynamically-typed guest value.
#[derive(Debug, Clone)]
pub enum GuestValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(GuestArray),
    Object(GuestObject),
    Function(NativeFunction),
}

impl GuestValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            GuestValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&GuestArray> {
        match self {
            GuestValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&GuestObject> {
        match self {
            GuestValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&NativeFunction> {
        match self {
            GuestValue::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GuestValue::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, GuestValue::Undefined)
    }

    /// The guest `typeof` of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            GuestValue::Undefined => "undefined",
            // typeof null === "object"
            GuestValue::Null | GuestValue::Array(_) | GuestValue::Object(_) => "object",
            GuestValue::Bool(_) => "boolean",
            GuestValue::Number(_) => "number",
            GuestValue::String(_) => "string",
            GuestValue::Function(_) => "function",
        }
    }

    /// Shallow equality: primitives by value, reference types by identity.
    pub fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (GuestValue::Undefined, GuestValue::Undefined) | (GuestValue::Null, GuestValue::Null) => {
                true
            }
            (GuestValue::Bool(a), GuestValue::Bool(b)) => a == b,
            (GuestValue::Number(a), GuestValue::Number(b)) => {
                a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
            }
            (GuestValue::String(a), GuestValue::String(b)) => a == b,
            (GuestValue::Array(a), GuestValue::Array(b)) => a.ptr_eq(b),
            (GuestValue::Object(a), GuestValue::Object(b)) => a.ptr_eq(b),
            (GuestValue::Function(a), GuestValue::Function(b)) => Arc::ptr_eq(&a.f, &b.f),
            _ => false,
        }
    }
}

impl From<&str> for GuestValue {
    fn from(s: &str) -> Self {
        GuestValue::String(s.to_string())
    }
}

impl From<String> for GuestValue {
    fn from(s: String) -> Self {
        GuestValue::String(s)
    }
}

/// Property attribute flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyFlags {
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}

impl PropertyFlags {
    /// Ordinary assignment: writable, enumerable, configurable.
    pub const DEFAULT: Self = Self {
        writable: true,
        enumerable: true,
        configurable: true,
    };

    /// Fixed and hidden: not writable, not enumerable, not configurable.
    pub const FROZEN: Self = Self {
        writable: false,
        enumerable: false,
        configurable: false,
    };

    /// Fixed but visible to enumeration.
    pub const READ_ONLY: Self = Self {
        writable: false,
        enumerable: true,
        configurable: false,
    };
}

/// A property value plus its flags.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub value: GuestValue,
    pub flags: PropertyFlags,
}

impl PropertyDescriptor {
    pub fn new(value: impl Into<GuestValue>, flags: PropertyFlags) -> Self {
        Self {
            value: value.into(),
            flags,
        }
    }

    pub fn frozen(value: impl Into<GuestValue>) -> Self {
        Self::new(value, PropertyFlags::FROZEN)
    }
}

/// A shared guest object. Properties keep definition order.
#[derive(Clone, Default)]
pub struct GuestObject(Arc<RwLock<Vec<(String, PropertyDescriptor)>>>);

impl GuestObject {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<(String, PropertyDescriptor)>> {
        self.0.read().unwrap_or_else(|poison| poison.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<(String, PropertyDescriptor)>> {
        self.0.write().unwrap_or_else(|poison| poison.into_inner())
    }

    /// Define or redefine an own property. Returns `false` when the existing
    /// property is non-configurable and the redefinition would change it.
    ///
    /// A non-configurable property may only be redefined when it is still
    /// writable, keeps its enumerability and stays non-configurable (the
    /// value may change and `writable` may be turned off).
    pub fn define_own_property(&self, name: &str, desc: PropertyDescriptor) -> bool {
        let mut props = self.write();
        let Some(i) = props.iter().position(|(k, _)| k == name) else {
            props.push((name.to_string(), desc));
            return true;
        };
        let existing = &mut props[i].1;
        if existing.flags.configurable {
            *existing = desc;
            return true;
        }
        let same_shape =
            !desc.flags.configurable && desc.flags.enumerable == existing.flags.enumerable;
        if !same_shape {
            return false;
        }
        if existing.flags.writable {
            *existing = desc;
            return true;
        }
        // Frozen: only an identical redefinition is accepted.
        !desc.flags.writable && desc.value.same_value(&existing.value)
    }

    /// Own property descriptor, if defined.
    pub fn get_own_property(&self, name: &str) -> Option<PropertyDescriptor> {
        self.read()
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, d)| d.clone())
    }

    /// Property value, `Undefined` when absent.
    pub fn get(&self, name: &str) -> GuestValue {
        self.get_own_property(name)
            .map(|d| d.value)
            .unwrap_or(GuestValue::Undefined)
    }

    pub fn has_own_property(&self, name: &str) -> bool {
        self.read().iter().any(|(k, _)| k == name)
    }

    /// Assignment (`obj[name] = value`). Returns `false` when the property is
    /// non-writable; a missing property is created with default flags.
    pub fn put(&self, name: &str, value: GuestValue) -> bool {
        let mut props = self.write();
        match props.iter().position(|(k, _)| k == name) {
            Some(i) if props[i].1.flags.writable => {
                props[i].1.value = value;
                true
            }
            Some(_) => false,
            None => {
                props.push((
                    name.to_string(),
                    PropertyDescriptor::new(value, PropertyFlags::DEFAULT),
                ));
                true
            }
        }
    }

    /// `delete obj[name]`. Returns `false` for non-configurable properties.
    pub fn delete(&self, name: &str) -> bool {
        let mut props = self.write();
        match props.iter().position(|(k, _)| k == name) {
            None => true,
            Some(i) if props[i].1.flags.configurable => {
                props.remove(i);
                true
            }
            Some(_) => false,
        }
    }

    /// Enumerable own keys in definition order (`Object.keys`).
    pub fn own_keys(&self) -> Vec<String> {
        self.read()
            .iter()
            .filter(|(_, d)| d.flags.enumerable)
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// All own keys, enumerable or not (`Object.getOwnPropertyNames`).
    pub fn own_property_names(&self) -> Vec<String> {
        self.read().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot of every own property with its descriptor.
    pub fn own_properties(&self) -> Vec<(String, PropertyDescriptor)> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for GuestObject {
    // Keys only; values may reference this object.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.own_property_names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_creates_enumerable_property() {
        let obj = GuestObject::new();
        assert!(obj.put("a", "1".into()));
        assert_eq!(obj.get("a").as_str(), Some("1"));
        assert_eq!(obj.own_keys(), vec!["a".to_string()]);
    }

    #[test]
    fn test_frozen_property_rejects_write_and_delete() {
        let obj = GuestObject::new();
        assert!(obj.define_own_property("k", PropertyDescriptor::frozen("v")));
        assert!(!obj.put("k", "other".into()));
        assert!(!obj.delete("k"));
        assert_eq!(obj.get("k").as_str(), Some("v"));
        assert!(obj.own_keys().is_empty());
        assert_eq!(obj.own_property_names(), vec!["k".to_string()]);
    }

    #[test]
    fn test_frozen_property_rejects_redefinition() {
        let obj = GuestObject::new();
        obj.define_own_property("k", PropertyDescriptor::frozen("v"));
        assert!(!obj.define_own_property("k", PropertyDescriptor::frozen("w")));
        assert!(!obj.define_own_property(
            "k",
            PropertyDescriptor::new("v", PropertyFlags::DEFAULT)
        ));
        // Identical redefinition is a no-op success.
        assert!(obj.define_own_property("k", PropertyDescriptor::frozen("v")));
        assert_eq!(obj.get("k").as_str(), Some("v"));
    }

    #[test]
    fn test_configurable_property_can_be_redefined_and_deleted() {
        let obj = GuestObject::new();
        obj.put("k", "v".into());
        assert!(obj.define_own_property("k", PropertyDescriptor::frozen("w")));
        assert_eq!(obj.get("k").as_str(), Some("w"));

        obj.put("gone", GuestValue::Null);
        assert!(obj.delete("gone"));
        assert!(!obj.has_own_property("gone"));
        assert!(obj.delete("never-defined"));
    }

    #[test]
    fn test_missing_property_is_undefined() {
        let obj = GuestObject::new();
        assert!(obj.get("nope").is_undefined());
    }

    #[test]
    fn test_array_clone_shares_storage() {
        let a = GuestArray::new();
        let b = a.clone();
        b.push("x".into());
        assert_eq!(a.strings(), vec!["x".to_string()]);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&GuestArray::new()));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(GuestValue::Null.type_name(), "object");
        assert_eq!(GuestValue::Undefined.type_name(), "undefined");
        let f = NativeFunction::new("f", |_| GuestValue::Null);
        assert_eq!(GuestValue::Function(f).type_name(), "function");
    }

    #[test]
    fn test_native_function_call() {
        let echo = NativeFunction::new("echo", |args| {
            args.first().cloned().unwrap_or(GuestValue::Undefined)
        });
        assert_eq!(echo.call(&["hi".into()]).as_str(), Some("hi"));
        assert!(echo.call(&[]).is_undefined());
        assert_eq!(format!("{:?}", echo), "[Function: echo]");
    }
}
