//! Tests for the built-in objects: `console` and `Function.prototype`.

extern crate this_binding;

use this_binding::runner::api::JsRunner;
use this_binding::runner::ds::error::JErrorType;
use this_binding::runner::ds::value::JsValue;
use this_binding::runner::plugin::registry::BuiltInRegistry;
use this_binding::runner::plugin::types::EvalContext;
use this_binding::runner::std_lib::function::FUNCTION_PROTOTYPE;

fn console_lines(code: &str) -> Vec<String> {
    let mut runner = JsRunner::default();
    runner.run_script(code).unwrap();
    runner.take_output()
}

// ============================================================================
// console tests
// ============================================================================

mod console_tests {
    use super::*;

    #[test]
    fn test_log_formats_like_node() {
        let lines = console_lines(
            r#"
            console.log({ name: "Steve", age: 30 });
            console.log([1, "two", null]);
            console.log("plain", 1.5, true, undefined);
            "#,
        );
        assert_eq!(
            lines,
            vec![
                "{ name: 'Steve', age: 30 }",
                "[ 1, 'two', null ]",
                "plain 1.5 true undefined",
            ]
        );
    }

    #[test]
    fn test_functions_print_their_inferred_names() {
        let lines = console_lines(
            r#"
            var sayName = function () {};
            var o = { greet() {} };
            console.log(sayName, o.greet, sayName.bind(null));
            "#,
        );
        assert_eq!(
            lines,
            vec!["[Function: sayName] [Function: greet] [Function: bound sayName]"]
        );
    }

    #[test]
    fn test_every_level_is_captured() {
        let lines = console_lines(
            "console.log('a'); console.info('b'); console.warn('c'); console.error('d');",
        );
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_console_methods_ignore_receiver() {
        let lines = console_lines("var log = console.log; log('detached');");
        assert_eq!(lines, vec!["detached"]);
    }
}

// ============================================================================
// Function.prototype tests
// ============================================================================

mod function_prototype_tests {
    use super::*;

    #[test]
    fn test_registry_exposes_call_apply_bind() {
        let registry = BuiltInRegistry::with_core();
        for method in ["call", "apply", "bind"] {
            assert!(
                registry.has_method(FUNCTION_PROTOTYPE, method),
                "missing Function.prototype.{}",
                method
            );
        }
    }

    #[test]
    fn test_methods_reject_non_function_receivers() {
        let registry = BuiltInRegistry::with_core();
        for method in ["call", "apply", "bind"] {
            let native = registry.get_method(FUNCTION_PROTOTYPE, method).unwrap();
            let mut ctx = EvalContext::new();
            let err = native(&mut ctx, JsValue::from("text"), vec![]).unwrap_err();
            assert_eq!(
                err,
                JErrorType::TypeError(format!(
                    "Function.prototype.{} called on a value that is not a function",
                    method
                ))
            );
        }
    }

    #[test]
    fn test_methods_are_shared_by_all_functions() {
        let mut runner = JsRunner::default();
        let result = runner
            .run_script(
                r#"
                function a() {}
                var b = function () {};
                var c = () => 1;
                a.call === b.call && b.call === c.call && a.bind === c.bind;
                "#,
            )
            .unwrap();
        assert_eq!(result, JsValue::Boolean(true));
    }

    #[test]
    fn test_call_with_no_arguments_passes_undefined_receiver() {
        let mut runner = JsRunner::default();
        let result = runner
            .run_script("function f() { return this === undefined; } f.call();")
            .unwrap();
        assert_eq!(result, JsValue::Boolean(true));
    }
}
