//! Core types for the evaluation engine.

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::operations::object::{get_v, put_v};
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::types::EvalContext;

/// Completion record type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionType {
    /// Normal completion - execution continues.
    Normal,
    /// Return completion - function returns.
    Return,
}

/// Completion record.
/// Every statement evaluation returns a completion record.
#[derive(Debug, Clone)]
pub struct Completion {
    pub completion_type: CompletionType,
    pub value: Option<JsValue>,
}

impl Completion {
    /// Create a normal completion with no value.
    pub fn normal() -> Self {
        Completion {
            completion_type: CompletionType::Normal,
            value: None,
        }
    }

    /// Create a normal completion with a value.
    pub fn normal_with_value(value: JsValue) -> Self {
        Completion {
            completion_type: CompletionType::Normal,
            value: Some(value),
        }
    }

    /// Create a return completion.
    pub fn return_value(value: JsValue) -> Self {
        Completion {
            completion_type: CompletionType::Return,
            value: Some(value),
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self.completion_type, CompletionType::Normal)
    }

    pub fn is_abrupt(&self) -> bool {
        !self.is_normal()
    }

    /// Get the value, or undefined if none.
    pub fn get_value(&self) -> JsValue {
        self.value.clone().unwrap_or(JsValue::Undefined)
    }

    /// Fill in the value of a normal completion that has none.
    pub fn update_empty(self, value: Option<JsValue>) -> Self {
        if self.is_normal() && self.value.is_none() {
            Completion { value, ..self }
        } else {
            self
        }
    }
}

/// What a reference points into.
#[derive(Debug, Clone)]
pub enum ReferenceBase {
    /// A property of a value (`base.name` or `base[name]`).
    Property(JsValue),
    /// A binding found through the lexical environment chain.
    Binding,
}

/// Resolved assignment target or callee. A property reference remembers its base, which
/// becomes the receiver when the reference is called.
#[derive(Debug, Clone)]
pub struct Reference {
    pub base: ReferenceBase,
    pub referenced_name: String,
    pub strict: bool,
}

impl Reference {
    pub fn property(base: JsValue, name: impl Into<String>, strict: bool) -> Self {
        Reference {
            base: ReferenceBase::Property(base),
            referenced_name: name.into(),
            strict,
        }
    }

    pub fn binding(name: impl Into<String>, strict: bool) -> Self {
        Reference {
            base: ReferenceBase::Binding,
            referenced_name: name.into(),
            strict,
        }
    }

    /// Receiver for a method call through this reference.
    pub fn get_this_value(&self) -> Option<JsValue> {
        match &self.base {
            ReferenceBase::Property(base) => Some(base.clone()),
            ReferenceBase::Binding => None,
        }
    }

    pub fn get_value(&self, ctx: &EvalContext) -> ValueResult {
        match &self.base {
            ReferenceBase::Property(base) => get_v(base, &self.referenced_name),
            ReferenceBase::Binding => ctx.get_binding(&self.referenced_name),
        }
    }

    pub fn put_value(&self, value: JsValue, ctx: &mut EvalContext) -> Result<(), JErrorType> {
        match &self.base {
            ReferenceBase::Property(base) => put_v(base, &self.referenced_name, value, self.strict),
            ReferenceBase::Binding => ctx.set_binding(&self.referenced_name, value),
        }
    }
}

/// Result type for evaluation operations.
pub type EvalResult = Result<Completion, JErrorType>;

/// Result type for value-returning operations.
pub type ValueResult = Result<JsValue, JErrorType>;

/// Result type for reference-returning operations.
pub type ReferenceResult = Result<Reference, JErrorType>;
