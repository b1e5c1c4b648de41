use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::runner::ds::function_object::JsFunctionObject;
use crate::runner::ds::value::JsValue;

pub type JsObjectType = Rc<RefCell<ObjectType>>;

/// Own properties in insertion order plus the prototype link.
pub struct ObjectBase {
    properties: HashMap<String, JsValue>,
    keys: Vec<String>,
    prototype: Option<JsObjectType>,
}
impl ObjectBase {
    pub fn new() -> Self {
        ObjectBase {
            properties: HashMap::new(),
            keys: Vec::new(),
            prototype: None,
        }
    }

    pub fn with_prototype(prototype: Option<JsObjectType>) -> Self {
        ObjectBase {
            properties: HashMap::new(),
            keys: Vec::new(),
            prototype,
        }
    }
}
impl Default for ObjectBase {
    fn default() -> Self {
        Self::new()
    }
}

pub trait JsObject {
    fn get_object_base(&self) -> &ObjectBase;

    fn get_object_base_mut(&mut self) -> &mut ObjectBase;

    fn get_prototype_of(&self) -> Option<JsObjectType> {
        self.get_object_base().prototype.clone()
    }

    fn set_prototype_of(&mut self, prototype: Option<JsObjectType>) {
        self.get_object_base_mut().prototype = prototype;
    }

    fn get_own_property(&self, key: &str) -> Option<&JsValue> {
        self.get_object_base().properties.get(key)
    }

    fn has_own_property(&self, key: &str) -> bool {
        self.get_object_base().properties.contains_key(key)
    }

    fn define_own_property(&mut self, key: String, value: JsValue) {
        let base = self.get_object_base_mut();
        if !base.properties.contains_key(&key) {
            base.keys.push(key.clone());
        }
        base.properties.insert(key, value);
    }

    fn own_property_keys(&self) -> Vec<String> {
        self.get_object_base().keys.clone()
    }
}

impl JsObject for ObjectBase {
    fn get_object_base(&self) -> &ObjectBase {
        self
    }

    fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        self
    }
}

pub struct JsArrayObject {
    pub elements: Vec<JsValue>,
    pub object_base: ObjectBase,
}
impl JsObject for JsArrayObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.object_base
    }

    fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.object_base
    }
}

pub enum ObjectType {
    Ordinary(ObjectBase),
    Function(JsFunctionObject),
    Array(JsArrayObject),
}
impl ObjectType {
    pub fn is_callable(&self) -> bool {
        matches!(self, ObjectType::Function(_))
    }

    pub fn as_js_object(&self) -> &dyn JsObject {
        match self {
            ObjectType::Ordinary(o) => o,
            ObjectType::Function(o) => o,
            ObjectType::Array(o) => o,
        }
    }

    pub fn as_js_object_mut(&mut self) -> &mut dyn JsObject {
        match self {
            ObjectType::Ordinary(o) => o,
            ObjectType::Function(o) => o,
            ObjectType::Array(o) => o,
        }
    }

    pub fn as_function(&self) -> Option<&JsFunctionObject> {
        match self {
            ObjectType::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Short label used in debug output and error messages.
    pub fn describe(&self) -> String {
        match self {
            ObjectType::Ordinary(_) => "[object Object]".to_string(),
            ObjectType::Array(a) => format!("[object Array({})]", a.elements.len()),
            ObjectType::Function(f) => format!("[Function: {}]", f.name),
        }
    }
}

pub fn new_js_object(object_type: ObjectType) -> JsObjectType {
    Rc::new(RefCell::new(object_type))
}

pub fn object_create(prototype: Option<JsObjectType>) -> JsObjectType {
    new_js_object(ObjectType::Ordinary(ObjectBase::with_prototype(prototype)))
}

pub fn array_create(elements: Vec<JsValue>) -> JsObjectType {
    new_js_object(ObjectType::Array(JsArrayObject {
        elements,
        object_base: ObjectBase::new(),
    }))
}
