//! Console built-in object.
//!
//! Provides console.log, console.error, console.warn, and console.info methods. Every call
//! produces one line, captured by the [`EvalContext`] and optionally echoed.

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::{JsObject, ObjectType};
use crate::runner::ds::operations::type_conversion::number_to_string;
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::{BuiltInObject, EvalContext};

/// Nesting depth past which objects collapse to `[Object]` / `[Array]`.
const MAX_INSPECT_DEPTH: usize = 2;

/// Register the console object with the registry.
pub fn register(registry: &mut BuiltInRegistry) {
    let console = BuiltInObject::new("console")
        .add_method("log", console_log)
        .add_method("error", console_error)
        .add_method("warn", console_warn)
        .add_method("info", console_info);

    registry.register_object(console);
}

/// Format all arguments for console output, separated by single spaces.
pub fn format_args(args: &[JsValue]) -> String {
    args.iter()
        .map(format_value)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Top-level strings print raw, everything else is inspected.
pub fn format_value(value: &JsValue) -> String {
    match value {
        JsValue::String(s) => s.clone(),
        _ => inspect(value, 0),
    }
}

fn inspect(value: &JsValue, depth: usize) -> String {
    match value {
        JsValue::Undefined => "undefined".to_string(),
        JsValue::Null => "null".to_string(),
        JsValue::Boolean(b) => b.to_string(),
        JsValue::Number(n) => number_to_string(n),
        JsValue::String(s) => format!("'{}'", s),
        JsValue::Object(o) => {
            let entries: Vec<(String, JsValue)> = match &*(**o).borrow() {
                ObjectType::Function(f) => {
                    return if f.name.is_empty() {
                        "[Function (anonymous)]".to_string()
                    } else {
                        format!("[Function: {}]", f.name)
                    };
                }
                ObjectType::Array(a) => {
                    if depth > MAX_INSPECT_DEPTH {
                        return "[Array]".to_string();
                    }
                    if a.elements.is_empty() {
                        return "[]".to_string();
                    }
                    let items: Vec<String> =
                        a.elements.iter().map(|e| inspect(e, depth + 1)).collect();
                    return format!("[ {} ]", items.join(", "));
                }
                ObjectType::Ordinary(base) => {
                    if depth > MAX_INSPECT_DEPTH {
                        return "[Object]".to_string();
                    }
                    base.own_property_keys()
                        .into_iter()
                        .map(|k| {
                            let v = base.get_own_property(&k).cloned().unwrap_or(JsValue::Undefined);
                            (k, v)
                        })
                        .collect()
                }
            };
            if entries.is_empty() {
                return "{}".to_string();
            }
            let fields: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", format_key(k), inspect(v, depth + 1)))
                .collect();
            format!("{{ {} }}", fields.join(", "))
        }
    }
}

fn format_key(key: &str) -> String {
    let is_identifier = key
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        .unwrap_or(false)
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        key.to_string()
    } else {
        format!("'{}'", key)
    }
}

/// console.log - Log to stdout.
fn console_log(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    ctx.write_console(format_args(&args), false);
    Ok(JsValue::Undefined)
}

/// console.error - Log to stderr.
fn console_error(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    ctx.write_console(format_args(&args), true);
    Ok(JsValue::Undefined)
}

/// console.warn - Log warning to stderr.
fn console_warn(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    ctx.write_console(format_args(&args), true);
    Ok(JsValue::Undefined)
}

/// console.info - Log info to stdout (same as log).
fn console_info(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    ctx.write_console(format_args(&args), false);
    Ok(JsValue::Undefined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::object::{array_create, object_create};
    use crate::runner::ds::operations::object::put;
    use crate::runner::ds::value::JsNumberType;

    #[test]
    fn objects_print_like_node() {
        let o = object_create(None);
        put(&o, "name", JsValue::from("Steve"));
        put(&o, "age", JsValue::from(30));
        assert_eq!(format_value(&JsValue::Object(o)), "{ name: 'Steve', age: 30 }");
    }

    #[test]
    fn arrays_and_empties() {
        let a = array_create(vec![JsValue::from(1), JsValue::from(2)]);
        assert_eq!(format_value(&JsValue::Object(a)), "[ 1, 2 ]");
        assert_eq!(format_value(&JsValue::Object(array_create(vec![]))), "[]");
        assert_eq!(format_value(&JsValue::Object(object_create(None))), "{}");
    }

    #[test]
    fn deep_nesting_collapses() {
        let innermost = object_create(None);
        put(&innermost, "x", JsValue::from(1));
        let mut current = innermost;
        for key in ["c", "b", "a"] {
            let parent = object_create(None);
            put(&parent, key, JsValue::Object(current));
            current = parent;
        }
        assert_eq!(
            format_value(&JsValue::Object(current)),
            "{ a: { b: { c: [Object] } } }"
        );
    }

    #[test]
    fn mixed_arguments() {
        let args = vec![
            JsValue::from("n ="),
            JsValue::Number(JsNumberType::Float(1.5)),
            JsValue::Undefined,
            JsValue::Null,
            JsValue::Boolean(true),
        ];
        assert_eq!(format_args(&args), "n = 1.5 undefined null true");
    }

    #[test]
    fn quoted_keys() {
        assert_eq!(format_key("first name"), "'first name'");
        assert_eq!(format_key("_id"), "_id");
    }
}
