use std::cell::RefCell;
use std::rc::Rc;

use crate::runner::ds::env_record::{
    DeclarativeEnvironmentRecord, EnvironmentRecordType, ObjectEnvironmentRecord,
};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::lex_env::{JsLexEnvironmentType, LexEnvironment};
use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::value::JsValue;

/// Walks outwards from `lex` and returns the first environment that binds `name`.
pub fn get_identifier_reference(
    lex: &JsLexEnvironmentType,
    name: &str,
) -> Option<JsLexEnvironmentType> {
    let mut current = Some(lex.clone());
    while let Some(env) = current {
        if (*env).borrow().inner.as_env_record().has_binding(name) {
            return Some(env);
        }
        current = (*env).borrow().outer.clone();
    }
    None
}

pub fn get_binding_value(env: &JsLexEnvironmentType, name: &str) -> Result<JsValue, JErrorType> {
    (*env).borrow().inner.as_env_record().get_binding_value(name)
}

pub fn set_mutable_binding(
    env: &JsLexEnvironmentType,
    name: &str,
    value: JsValue,
) -> Result<(), JErrorType> {
    (*env)
        .borrow_mut()
        .inner
        .as_env_record_mut()
        .set_mutable_binding(name.to_string(), value)
}

pub fn new_declarative_environment(outer_lex: Option<JsLexEnvironmentType>) -> JsLexEnvironmentType {
    Rc::new(RefCell::new(LexEnvironment {
        inner: Box::new(EnvironmentRecordType::Declarative(
            DeclarativeEnvironmentRecord::new(),
        )),
        outer: outer_lex,
    }))
}

pub fn new_object_environment(
    o: JsObjectType,
    outer_lex: Option<JsLexEnvironmentType>,
) -> JsLexEnvironmentType {
    Rc::new(RefCell::new(LexEnvironment {
        inner: Box::new(EnvironmentRecordType::Object(ObjectEnvironmentRecord::new(o))),
        outer: outer_lex,
    }))
}

pub fn new_global_environment(global_object: JsObjectType) -> JsLexEnvironmentType {
    new_object_environment(global_object, None)
}
