use std::collections::HashMap;

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::operations::object::{get, put};
use crate::runner::ds::value::JsValue;

pub trait EnvironmentRecord {
    fn has_binding(&self, name: &str) -> bool;
    fn create_mutable_binding(&mut self, name: String);
    fn create_immutable_binding(&mut self, name: String);
    fn initialize_binding(&mut self, name: String, value: JsValue);
    fn set_mutable_binding(&mut self, name: String, value: JsValue) -> Result<(), JErrorType>;
    fn get_binding_value(&self, name: &str) -> Result<JsValue, JErrorType>;
}

pub enum EnvironmentRecordType {
    Declarative(DeclarativeEnvironmentRecord),
    Object(ObjectEnvironmentRecord),
}
impl EnvironmentRecordType {
    pub fn as_env_record(&self) -> &dyn EnvironmentRecord {
        match self {
            EnvironmentRecordType::Declarative(d) => d,
            EnvironmentRecordType::Object(d) => d,
        }
    }

    pub fn as_env_record_mut(&mut self) -> &mut dyn EnvironmentRecord {
        match self {
            EnvironmentRecordType::Declarative(d) => d,
            EnvironmentRecordType::Object(d) => d,
        }
    }
}

struct Binding {
    value: Option<JsValue>,
    mutable: bool,
}

pub struct DeclarativeEnvironmentRecord {
    bindings: HashMap<String, Binding>,
}
impl DeclarativeEnvironmentRecord {
    pub fn new() -> Self {
        DeclarativeEnvironmentRecord {
            bindings: HashMap::new(),
        }
    }
}
impl Default for DeclarativeEnvironmentRecord {
    fn default() -> Self {
        Self::new()
    }
}
impl EnvironmentRecord for DeclarativeEnvironmentRecord {
    fn has_binding(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    fn create_mutable_binding(&mut self, name: String) {
        self.bindings.entry(name).or_insert(Binding {
            value: None,
            mutable: true,
        });
    }

    fn create_immutable_binding(&mut self, name: String) {
        self.bindings.entry(name).or_insert(Binding {
            value: None,
            mutable: false,
        });
    }

    fn initialize_binding(&mut self, name: String, value: JsValue) {
        if let Some(binding) = self.bindings.get_mut(&name) {
            binding.value = Some(value);
        }
    }

    fn set_mutable_binding(&mut self, name: String, value: JsValue) -> Result<(), JErrorType> {
        match self.bindings.get_mut(&name) {
            None => Err(JErrorType::ReferenceError(format!("{} is not defined", name))),
            Some(binding) => {
                if binding.value.is_none() {
                    Err(JErrorType::ReferenceError(format!(
                        "Cannot access '{}' before initialization",
                        name
                    )))
                } else if !binding.mutable {
                    Err(JErrorType::TypeError(
                        "Assignment to constant variable".to_string(),
                    ))
                } else {
                    binding.value = Some(value);
                    Ok(())
                }
            }
        }
    }

    fn get_binding_value(&self, name: &str) -> Result<JsValue, JErrorType> {
        match self.bindings.get(name) {
            None => Err(JErrorType::ReferenceError(format!("{} is not defined", name))),
            Some(Binding { value: None, .. }) => Err(JErrorType::ReferenceError(format!(
                "Cannot access '{}' before initialization",
                name
            ))),
            Some(Binding { value: Some(v), .. }) => Ok(v.clone()),
        }
    }
}

/// Binds names to the properties of an object. The global scope is one of these, so
/// `var` at the top level shows up as a property of the global object.
pub struct ObjectEnvironmentRecord {
    binding_object: JsObjectType,
}
impl ObjectEnvironmentRecord {
    pub fn new(o: JsObjectType) -> Self {
        ObjectEnvironmentRecord { binding_object: o }
    }

    pub fn get_binding_object(&self) -> &JsObjectType {
        &self.binding_object
    }
}
impl EnvironmentRecord for ObjectEnvironmentRecord {
    fn has_binding(&self, name: &str) -> bool {
        (*self.binding_object)
            .borrow()
            .as_js_object()
            .has_own_property(name)
    }

    fn create_mutable_binding(&mut self, name: String) {
        if !self.has_binding(&name) {
            put(&self.binding_object, &name, JsValue::Undefined);
        }
    }

    fn create_immutable_binding(&mut self, name: String) {
        self.create_mutable_binding(name)
    }

    fn initialize_binding(&mut self, name: String, value: JsValue) {
        put(&self.binding_object, &name, value);
    }

    fn set_mutable_binding(&mut self, name: String, value: JsValue) -> Result<(), JErrorType> {
        put(&self.binding_object, &name, value);
        Ok(())
    }

    fn get_binding_value(&self, name: &str) -> Result<JsValue, JErrorType> {
        if self.has_binding(name) {
            Ok(get(&self.binding_object, name))
        } else {
            Err(JErrorType::ReferenceError(format!("{} is not defined", name)))
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::runner::ds::object::object_create;

    #[test]
    fn const_binding_rejects_assignment() {
        let mut record = DeclarativeEnvironmentRecord::new();
        record.create_immutable_binding("x".to_string());
        record.initialize_binding("x".to_string(), JsValue::from(1));
        let err = record
            .set_mutable_binding("x".to_string(), JsValue::from(2))
            .unwrap_err();
        assert_eq!(
            err,
            JErrorType::TypeError("Assignment to constant variable".to_string())
        );
        assert_eq!(record.get_binding_value("x").unwrap(), JsValue::from(1));
    }

    #[test]
    fn uninitialized_binding_is_not_readable() {
        let mut record = DeclarativeEnvironmentRecord::new();
        record.create_mutable_binding("y".to_string());
        assert!(matches!(
            record.get_binding_value("y"),
            Err(JErrorType::ReferenceError(_))
        ));
    }

    #[test]
    fn object_record_writes_through_to_properties() {
        let global = object_create(None);
        let mut record = ObjectEnvironmentRecord::new(global.clone());
        record.create_mutable_binding("name".to_string());
        assert_eq!(get(&global, "name"), JsValue::Undefined);
        record
            .set_mutable_binding("name".to_string(), JsValue::from("Stacy"))
            .unwrap();
        assert_eq!(get(&global, "name"), JsValue::from("Stacy"));
        assert!(record.has_binding("name"));
    }
}
