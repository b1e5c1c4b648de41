//! Tree-walking evaluation of the AST.

pub mod expression;
pub mod function;
pub mod statement;
pub mod types;

pub use statement::run_program;
pub use types::{Completion, CompletionType, Reference, ReferenceBase};
