//! # this-binding - receiver resolution for a small JavaScript subset
//!
//! A tree-walking interpreter built around one question: which object does `this` refer to
//! inside a called function? It covers:
//! - method calls (`obj.f()`)
//! - explicit receivers through `call`, `apply` and `bind`
//! - constructor calls with `new`
//! - arrow functions, which keep the receiver of their defining frame
//! - plain calls, which see the global object or `undefined` in strict mode
//!
//! ## Quick Start
//!
//! ### Parsing
//!
//! ```
//! use this_binding::parser::JsParser;
//!
//! let ast = JsParser::parse_to_ast_from_str("me.sayName();").unwrap();
//! assert_eq!(ast.body.len(), 1);
//! ```
//!
//! ### Running a script
//!
//! ```
//! use this_binding::runner::api::JsRunner;
//! use this_binding::runner::config::EngineConfig;
//!
//! let mut runner = JsRunner::new(EngineConfig::default());
//! runner
//!     .run_script(
//!         "var me = { name: 'Steve', sayName: function () { console.log(this.name); } };
//!          me.sayName();
//!          me.sayName.call({ name: 'Jack' });",
//!     )
//!     .unwrap();
//! assert_eq!(runner.output(), &["Steve".to_string(), "Jack".to_string()]);
//! ```
//!
//! ### Strict mode
//!
//! With [`runner::config::EngineConfig::strict_mode`] set (or a `"use strict"` directive),
//! a plain call receives `undefined`, and reading a property through it fails:
//!
//! ```
//! use this_binding::runner::api::JsRunner;
//! use this_binding::runner::config::EngineConfig;
//! use this_binding::runner::ds::error::JErrorType;
//!
//! let mut runner = JsRunner::new(EngineConfig::new().with_strict_mode(true));
//! let err = runner
//!     .run_script("var f = function () { return this.word; }; f();")
//!     .unwrap_err();
//! assert!(matches!(
//!     err.runtime_error(),
//!     Some(JErrorType::ReferenceTypeError(_))
//! ));
//! ```
//!
//! ## Architecture
//!
//! - **[`parser`]** - PEG grammar (pest) and AST types
//! - **[`runner`]** - the interpreter
//!   - **[`runner::binding`]** - the receiver resolution rules
//!   - **[`runner::ds`]** - values, objects, function objects, environments, frames
//!   - **[`runner::eval`]** - statement and expression evaluation
//!   - **[`runner::plugin`]** - evaluation context and built-in registry
//!   - **[`runner::std_lib`]** - `console` and `Function.prototype`
//! - **[`demo`]** - the bundled demonstration script

#[macro_use]
extern crate lazy_static;

pub mod demo;
pub mod parser;
pub mod runner;
