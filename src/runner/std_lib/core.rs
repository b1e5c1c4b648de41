//! Core built-ins registration.

use crate::runner::plugin::registry::BuiltInRegistry;

use super::console;
use super::function;

/// Register all core built-in objects with the registry.
pub fn register_core_builtins(registry: &mut BuiltInRegistry) {
    console::register(registry);
    function::register(registry);
}
