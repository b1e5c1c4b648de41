//! The bundled demonstration script.
//!
//! ```
//! use this_binding::demo::{run_demo, EXPECTED_OUTPUT};
//! use this_binding::runner::config::EngineConfig;
//!
//! let lines = run_demo(EngineConfig::default()).unwrap();
//! assert_eq!(lines, EXPECTED_OUTPUT);
//! ```

use crate::runner::api::{run_script, JsRunError};
use crate::runner::config::EngineConfig;

pub const DEMO_SCRIPT: &str = include_str!("../demos/this_binding.js");

/// Console lines of [`DEMO_SCRIPT`] in sloppy mode.
pub const EXPECTED_OUTPUT: &[&str] = &[
    "Steve",
    "Jack",
    "Jim",
    "Stacy",
    "My name is Steve and I know JavaScript, Ruby, and Python!",
    "My name is Steve and I know JavaScript, Ruby, and Python!",
    "My name is Steve and I know JavaScript, Ruby, and Python!",
    "Zenus",
    "striped",
    "zebra",
    "outer",
    "Hello",
];

pub fn run_demo(config: EngineConfig) -> Result<Vec<String>, JsRunError> {
    run_script(DEMO_SCRIPT, config)
}
