use std::rc::Rc;

use crate::parser::ast::FunctionData;
use crate::runner::ds::lex_env::JsLexEnvironmentType;
use crate::runner::ds::object::{JsObject, JsObjectType, ObjectBase};
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::types::NativeFn;

/// How a function obtains its receiver.
#[derive(Clone)]
pub enum ThisMode {
    /// Arrow functions keep the receiver that was in effect where they were created.
    Lexical(JsValue),
    /// Every call decides the receiver from the call form.
    Dynamic,
}

#[derive(Clone)]
pub enum FunctionCode {
    Script {
        data: Rc<FunctionData>,
        environment: JsLexEnvironmentType,
    },
    Native(NativeFn),
    Bound {
        target: JsObjectType,
        bound_args: Vec<JsValue>,
    },
}

pub struct JsFunctionObject {
    pub name: String,
    pub this_mode: ThisMode,
    /// Receiver fixed by `bind`. Only bound function exotic objects carry one.
    pub bound_this: Option<JsValue>,
    pub strict: bool,
    pub code: FunctionCode,
    pub constructable: bool,
    pub object_base: ObjectBase,
}
impl JsFunctionObject {
    pub fn new_normal_function(
        name: String,
        data: Rc<FunctionData>,
        environment: JsLexEnvironmentType,
        strict: bool,
        function_prototype: Option<JsObjectType>,
    ) -> Self {
        JsFunctionObject {
            name,
            this_mode: ThisMode::Dynamic,
            bound_this: None,
            strict,
            code: FunctionCode::Script { data, environment },
            constructable: true,
            object_base: ObjectBase::with_prototype(function_prototype),
        }
    }

    pub fn new_arrow_function(
        name: String,
        data: Rc<FunctionData>,
        environment: JsLexEnvironmentType,
        strict: bool,
        captured_this: JsValue,
        function_prototype: Option<JsObjectType>,
    ) -> Self {
        JsFunctionObject {
            name,
            this_mode: ThisMode::Lexical(captured_this),
            bound_this: None,
            strict,
            code: FunctionCode::Script { data, environment },
            constructable: false,
            object_base: ObjectBase::with_prototype(function_prototype),
        }
    }

    pub fn new_native_function(
        name: String,
        native: NativeFn,
        function_prototype: Option<JsObjectType>,
    ) -> Self {
        JsFunctionObject {
            name,
            this_mode: ThisMode::Dynamic,
            bound_this: None,
            strict: false,
            code: FunctionCode::Native(native),
            constructable: false,
            object_base: ObjectBase::with_prototype(function_prototype),
        }
    }

    pub fn new_bound_function(
        target: JsObjectType,
        target_name: &str,
        constructable: bool,
        bound_this: JsValue,
        bound_args: Vec<JsValue>,
        function_prototype: Option<JsObjectType>,
    ) -> Self {
        JsFunctionObject {
            name: format!("bound {}", target_name),
            this_mode: ThisMode::Dynamic,
            bound_this: Some(bound_this),
            strict: false,
            code: FunctionCode::Bound { target, bound_args },
            constructable,
            object_base: ObjectBase::with_prototype(function_prototype),
        }
    }

    pub fn is_arrow(&self) -> bool {
        matches!(self.this_mode, ThisMode::Lexical(_))
    }

    pub fn is_bound(&self) -> bool {
        self.bound_this.is_some()
    }

    pub fn is_constructor(&self) -> bool {
        self.constructable
    }
}
impl JsObject for JsFunctionObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.object_base
    }

    fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.object_base
    }
}
