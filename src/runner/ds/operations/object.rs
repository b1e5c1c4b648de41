use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::{JsObject, JsObjectType, ObjectType};
use crate::runner::ds::operations::type_conversion::{get_type, to_string};
use crate::runner::ds::value::JsValue;

pub const PROPERTY_LENGTH: &str = "length";
pub const PROPERTY_NAME: &str = "name";
pub const PROPERTY_PROTOTYPE: &str = "prototype";

/// Largest valid array index, 2^32 - 2.
pub const MAX_ARRAY_INDEX: usize = 4_294_967_294;
/// Writes at or past this index are kept as plain own properties instead of growing storage.
pub const MAX_DENSE_LENGTH: usize = 1 << 20;

/// Canonical array index: digits only, no leading zeros, at most [`MAX_ARRAY_INDEX`].
pub fn to_array_index(key: &str) -> Option<usize> {
    let index = key.parse::<u64>().ok()?;
    if index > MAX_ARRAY_INDEX as u64 || index.to_string() != key {
        return None;
    }
    usize::try_from(index).ok()
}

/// Property lookup along the prototype chain. Missing properties read as `undefined`.
pub fn get(o: &JsObjectType, key: &str) -> JsValue {
    let mut current = o.clone();
    loop {
        let next = {
            let obj = (*current).borrow();
            match &*obj {
                ObjectType::Array(a) => {
                    if key == PROPERTY_LENGTH {
                        return JsValue::from(a.elements.len() as i64);
                    }
                    if let Some(value) = to_array_index(key).and_then(|i| a.elements.get(i)) {
                        return value.clone();
                    }
                }
                ObjectType::Function(f) => {
                    if key == PROPERTY_NAME && !f.has_own_property(key) {
                        return JsValue::String(f.name.clone());
                    }
                }
                ObjectType::Ordinary(_) => {}
            }
            let js_object = obj.as_js_object();
            if let Some(v) = js_object.get_own_property(key) {
                return v.clone();
            }
            js_object.get_prototype_of()
        };
        match next {
            Some(prototype) => current = prototype,
            None => return JsValue::Undefined,
        }
    }
}

pub fn put(o: &JsObjectType, key: &str, value: JsValue) {
    let mut obj = (*o).borrow_mut();
    if let ObjectType::Array(a) = &mut *obj {
        if let Some(index) = to_array_index(key).filter(|i| *i < MAX_DENSE_LENGTH) {
            if index >= a.elements.len() {
                a.elements.resize(index + 1, JsValue::Undefined);
            }
            a.elements[index] = value;
            return;
        }
    }
    obj.as_js_object_mut().define_own_property(key.to_string(), value);
}

/// Reads `base[key]` for any value. Reading through `undefined` or `null` fails.
pub fn get_v(base: &JsValue, key: &str) -> Result<JsValue, JErrorType> {
    match base {
        JsValue::Undefined | JsValue::Null => Err(JErrorType::ReferenceTypeError(format!(
            "Cannot read properties of {} (reading '{}')",
            to_string(base),
            key
        ))),
        JsValue::Object(o) => Ok(get(o, key)),
        JsValue::String(s) => {
            if key == PROPERTY_LENGTH {
                Ok(JsValue::from(s.chars().count() as i64))
            } else if let Some(index) = to_array_index(key) {
                Ok(s.chars()
                    .nth(index)
                    .map(|c| JsValue::String(c.to_string()))
                    .unwrap_or(JsValue::Undefined))
            } else {
                Ok(JsValue::Undefined)
            }
        }
        JsValue::Boolean(_) | JsValue::Number(_) => Ok(JsValue::Undefined),
    }
}

/// Writes `base[key] = value`. Writes to primitives are dropped unless `strict`.
pub fn put_v(base: &JsValue, key: &str, value: JsValue, strict: bool) -> Result<(), JErrorType> {
    match base {
        JsValue::Undefined | JsValue::Null => Err(JErrorType::ReferenceTypeError(format!(
            "Cannot set properties of {} (setting '{}')",
            to_string(base),
            key
        ))),
        JsValue::Object(o) => {
            put(o, key, value);
            Ok(())
        }
        _ => {
            if strict {
                Err(JErrorType::TypeError(format!(
                    "Cannot create property '{}' on {} '{}'",
                    key,
                    get_type(base),
                    to_string(base)
                )))
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::runner::ds::object::{array_create, object_create};

    #[test]
    fn get_follows_the_prototype_chain() {
        let proto = object_create(None);
        put(&proto, "greet", JsValue::from("hi"));
        let o = object_create(Some(proto));
        assert_eq!(get(&o, "greet"), JsValue::from("hi"));
        assert_eq!(get(&o, "missing"), JsValue::Undefined);
    }

    #[test]
    fn array_indexes_and_length() {
        let a = array_create(vec![JsValue::from(1), JsValue::from(2)]);
        assert_eq!(get(&a, "length"), JsValue::from(2));
        assert_eq!(get(&a, "1"), JsValue::from(2));
        put(&a, "3", JsValue::from(4));
        assert_eq!(get(&a, "length"), JsValue::from(4));
        assert_eq!(get(&a, "2"), JsValue::Undefined);
        assert_eq!(to_array_index("01"), None);
    }

    #[test]
    fn out_of_range_indexes_are_plain_properties() {
        assert_eq!(to_array_index("4294967294"), Some(MAX_ARRAY_INDEX));
        assert_eq!(to_array_index("4294967295"), None);
        assert_eq!(to_array_index("18446744073709551615"), None);
        assert_eq!(to_array_index("18446744073709551616"), None);

        let a = array_create(vec![]);
        put(&a, "18446744073709551615", JsValue::from(1));
        put(&a, "4294967295", JsValue::from(2));
        put(&a, "4294967294", JsValue::from(3));
        assert_eq!(get(&a, "length"), JsValue::from(0));
        assert_eq!(get(&a, "18446744073709551615"), JsValue::from(1));
        assert_eq!(get(&a, "4294967295"), JsValue::from(2));
        assert_eq!(get(&a, "4294967294"), JsValue::from(3));
        assert_eq!(get(&a, "0"), JsValue::Undefined);
    }

    #[test]
    fn reading_through_undefined_is_a_reference_type_error() {
        let err = get_v(&JsValue::Undefined, "name").unwrap_err();
        assert_eq!(
            err,
            JErrorType::ReferenceTypeError(
                "Cannot read properties of undefined (reading 'name')".to_string()
            )
        );
        let err = put_v(&JsValue::Null, "x", JsValue::from(1), false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Uncaught reference type error: Cannot set properties of null (setting 'x')."
        );
    }

    #[test]
    fn primitive_writes_only_fail_in_strict_code() {
        let base = JsValue::from("abc");
        assert!(put_v(&base, "x", JsValue::from(1), false).is_ok());
        assert!(matches!(
            put_v(&base, "x", JsValue::from(1), true),
            Err(JErrorType::TypeError(_))
        ));
        assert_eq!(get_v(&base, "length").unwrap(), JsValue::from(3));
    }
}
