//! Standard library built-in objects: `console` and the `Function.prototype` methods that
//! choose a receiver explicitly.

pub mod console;
pub mod core;
pub mod function;

pub use self::core::register_core_builtins;
