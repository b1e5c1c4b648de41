use std::rc::Rc;

use crate::runner::ds::operations::type_conversion::to_number;
use crate::runner::ds::value::{JsNumberType, JsValue};

pub fn is_strictly_equal(left: &JsValue, right: &JsValue) -> bool {
    match (left, right) {
        (JsValue::Undefined, JsValue::Undefined) => true,
        (JsValue::Null, JsValue::Null) => true,
        (JsValue::Boolean(a), JsValue::Boolean(b)) => a == b,
        (JsValue::String(a), JsValue::String(b)) => a == b,
        (JsValue::Number(JsNumberType::NaN), _) | (_, JsValue::Number(JsNumberType::NaN)) => false,
        (JsValue::Number(a), JsValue::Number(b)) => a.as_f64() == b.as_f64(),
        (JsValue::Object(a), JsValue::Object(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

pub fn is_loosely_equal(left: &JsValue, right: &JsValue) -> bool {
    if std::mem::discriminant(left) == std::mem::discriminant(right) {
        return is_strictly_equal(left, right);
    }
    match (left, right) {
        (JsValue::Null, JsValue::Undefined) | (JsValue::Undefined, JsValue::Null) => true,
        (JsValue::Number(_), JsValue::String(_)) => {
            is_strictly_equal(left, &JsValue::Number(to_number(right)))
        }
        (JsValue::String(_), JsValue::Number(_)) => {
            is_strictly_equal(&JsValue::Number(to_number(left)), right)
        }
        (JsValue::Boolean(_), _) => is_loosely_equal(&JsValue::Number(to_number(left)), right),
        (_, JsValue::Boolean(_)) => is_loosely_equal(left, &JsValue::Number(to_number(right))),
        _ => false,
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn integer_and_float_compare_by_value() {
        assert!(is_strictly_equal(
            &JsValue::Number(JsNumberType::Integer(2)),
            &JsValue::Number(JsNumberType::Float(2.0))
        ));
        assert!(!is_strictly_equal(
            &JsValue::Number(JsNumberType::NaN),
            &JsValue::Number(JsNumberType::NaN)
        ));
    }

    #[test]
    fn loose_equality_coerces() {
        assert!(is_loosely_equal(&JsValue::Null, &JsValue::Undefined));
        assert!(is_loosely_equal(&JsValue::from("1"), &JsValue::from(1)));
        assert!(is_loosely_equal(&JsValue::Boolean(true), &JsValue::from(1)));
        assert!(!is_loosely_equal(&JsValue::Null, &JsValue::from(0)));
    }
}
