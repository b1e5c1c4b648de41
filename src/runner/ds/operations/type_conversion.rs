use crate::runner::ds::object::ObjectType;
use crate::runner::ds::value::{JsNumberType, JsValue};

pub const TYPE_STR_UNDEFINED: &str = "undefined";
pub const TYPE_STR_NULL: &str = "null";
pub const TYPE_STR_BOOLEAN: &str = "boolean";
pub const TYPE_STR_STRING: &str = "string";
pub const TYPE_STR_NUMBER: &str = "number";
pub const TYPE_STR_OBJECT: &str = "object";
pub const TYPE_STR_FUNCTION: &str = "function";

pub fn get_type(a: &JsValue) -> &'static str {
    match a {
        JsValue::Undefined => TYPE_STR_UNDEFINED,
        JsValue::Null => TYPE_STR_NULL,
        JsValue::Boolean(_) => TYPE_STR_BOOLEAN,
        JsValue::String(_) => TYPE_STR_STRING,
        JsValue::Number(_) => TYPE_STR_NUMBER,
        JsValue::Object(o) => match *(**o).borrow() {
            ObjectType::Function(_) => TYPE_STR_FUNCTION,
            ObjectType::Ordinary(_) | ObjectType::Array(_) => TYPE_STR_OBJECT,
        },
    }
}

/// Result of the `typeof` operator.
pub fn type_of(a: &JsValue) -> &'static str {
    match a {
        JsValue::Null => TYPE_STR_OBJECT,
        _ => get_type(a),
    }
}

pub fn to_boolean(value: &JsValue) -> bool {
    match value {
        JsValue::Undefined | JsValue::Null => false,
        JsValue::Boolean(b) => *b,
        JsValue::Number(n) => match n {
            JsNumberType::Integer(i) => *i != 0,
            JsNumberType::Float(f) => *f != 0.0 && !f.is_nan(),
            JsNumberType::NaN => false,
            JsNumberType::PositiveInfinity | JsNumberType::NegativeInfinity => true,
        },
        JsValue::String(s) => !s.is_empty(),
        JsValue::Object(_) => true,
    }
}

pub fn to_number(v: &JsValue) -> JsNumberType {
    match v {
        JsValue::Undefined => JsNumberType::NaN,
        JsValue::Null => JsNumberType::Integer(0),
        JsValue::Boolean(b) => JsNumberType::Integer(if *b { 1 } else { 0 }),
        JsValue::Number(n) => n.clone(),
        JsValue::String(s) => string_to_number(s),
        JsValue::Object(_) => string_to_number(&to_string(v)),
    }
}

fn string_to_number(s: &str) -> JsNumberType {
    let s = s.trim();
    match s {
        "" => JsNumberType::Integer(0),
        "Infinity" | "+Infinity" => JsNumberType::PositiveInfinity,
        "-Infinity" => JsNumberType::NegativeInfinity,
        _ => {
            if !s
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
            {
                return JsNumberType::NaN;
            }
            if let Ok(i) = s.parse::<i64>() {
                JsNumberType::Integer(i)
            } else if let Ok(f) = s.parse::<f64>() {
                JsNumberType::from_f64(f)
            } else {
                JsNumberType::NaN
            }
        }
    }
}

pub fn number_to_string(n: &JsNumberType) -> String {
    match n {
        JsNumberType::Float(f) if *f == 0.0 => "0".to_string(),
        _ => n.to_string(),
    }
}

pub fn to_string(v: &JsValue) -> String {
    match v {
        JsValue::Undefined => TYPE_STR_UNDEFINED.to_string(),
        JsValue::Null => TYPE_STR_NULL.to_string(),
        JsValue::Boolean(b) => b.to_string(),
        JsValue::String(s) => s.clone(),
        JsValue::Number(n) => number_to_string(n),
        JsValue::Object(o) => {
            let elements = match &*(**o).borrow() {
                ObjectType::Ordinary(_) => return "[object Object]".to_string(),
                ObjectType::Function(f) => {
                    return format!("function {}() {{ [code] }}", f.name);
                }
                ObjectType::Array(a) => a.elements.clone(),
            };
            elements
                .iter()
                .map(|e| if e.is_nullish() { String::new() } else { to_string(e) })
                .collect::<Vec<_>>()
                .join(",")
        }
    }
}

pub fn to_property_key(v: &JsValue) -> String {
    to_string(v)
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::runner::ds::object::array_create;

    #[test]
    fn typeof_null_is_object() {
        assert_eq!(type_of(&JsValue::Null), "object");
        assert_eq!(get_type(&JsValue::Null), "null");
        assert_eq!(type_of(&JsValue::Undefined), "undefined");
    }

    #[test]
    fn string_conversions() {
        assert_eq!(to_number(&JsValue::from(" 42 ")), JsNumberType::Integer(42));
        assert_eq!(to_number(&JsValue::from("4.5")), JsNumberType::Float(4.5));
        assert_eq!(to_number(&JsValue::from("inf")), JsNumberType::NaN);
        assert_eq!(to_number(&JsValue::from("")), JsNumberType::Integer(0));
        assert_eq!(number_to_string(&JsNumberType::Float(-0.0)), "0");
        assert_eq!(number_to_string(&JsNumberType::Float(2.0)), "2");
    }

    #[test]
    fn arrays_join_with_commas() {
        let a = array_create(vec![
            JsValue::from("JavaScript"),
            JsValue::Undefined,
            JsValue::from(3),
        ]);
        assert_eq!(to_string(&JsValue::Object(a)), "JavaScript,,3");
    }
}
