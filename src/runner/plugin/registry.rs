//! Built-in registry for managing built-in objects.

use std::collections::HashMap;

use super::types::{BuiltInObject, NativeFn};
use crate::runner::std_lib::register_core_builtins;

/// Registry for built-in objects.
/// Holds the definitions until an [`EvalContext`](super::types::EvalContext) materialises them.
pub struct BuiltInRegistry {
    objects: HashMap<String, BuiltInObject>,
}

impl BuiltInRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        BuiltInRegistry {
            objects: HashMap::new(),
        }
    }

    /// Create a registry with the core built-ins (`console`, `Function.prototype`).
    pub fn with_core() -> Self {
        let mut registry = Self::new();
        register_core_builtins(&mut registry);
        registry
    }

    /// Register a built-in object. A later registration under the same name replaces it.
    pub fn register_object(&mut self, obj: BuiltInObject) {
        self.objects.insert(obj.name.clone(), obj);
    }

    pub fn get_object(&self, name: &str) -> Option<&BuiltInObject> {
        self.objects.get(name)
    }

    pub fn get_method(&self, object: &str, method: &str) -> Option<NativeFn> {
        self.objects
            .get(object)
            .and_then(|obj| obj.methods.get(method))
            .copied()
    }

    pub fn has_object(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn has_method(&self, object: &str, method: &str) -> bool {
        self.get_method(object, method).is_some()
    }

    /// Get list of all registered object names, sorted.
    pub fn object_names(&self) -> Vec<&String> {
        let mut names: Vec<&String> = self.objects.keys().collect();
        names.sort();
        names
    }

    pub(crate) fn into_objects(self) -> Vec<BuiltInObject> {
        let mut objects: Vec<BuiltInObject> = self.objects.into_values().collect();
        objects.sort_by(|a, b| a.name.cmp(&b.name));
        objects
    }
}

impl Default for BuiltInRegistry {
    fn default() -> Self {
        Self::with_core()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_registry_has_console_and_function_methods() {
        let registry = BuiltInRegistry::with_core();
        assert!(registry.has_object("console"));
        assert!(registry.has_method("console", "log"));
        assert!(registry.has_method("Function.prototype", "bind"));
        assert!(!registry.has_method("console", "table"));
    }

    #[test]
    fn empty_registry() {
        let registry = BuiltInRegistry::new();
        assert!(registry.object_names().is_empty());
        assert!(registry.get_object("console").is_none());
    }
}
