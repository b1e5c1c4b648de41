//! Built-in objects and the evaluation context they run in.
//!
//! Built-ins are described declaratively as [`BuiltInObject`]s, collected in a
//! [`BuiltInRegistry`] and turned into real function objects by
//! [`EvalContext::install_core_builtins`]:
//!
//! ```
//! use this_binding::runner::plugin::registry::BuiltInRegistry;
//! use this_binding::runner::plugin::types::EvalContext;
//!
//! let mut ctx = EvalContext::new();
//! ctx.install_core_builtins(BuiltInRegistry::with_core());
//! assert!(ctx.get_binding("console").is_ok());
//! ```

pub mod registry;
pub mod types;

pub use registry::BuiltInRegistry;
pub use types::{BuiltInObject, BuiltInTarget, EvalContext, NativeFn};
