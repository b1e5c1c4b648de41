//! `Function.prototype.call`, `apply` and `bind`.

use crate::runner::binding::{CallForm, ExplicitVia};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::JsFunctionObject;
use crate::runner::ds::object::{new_js_object, JsObjectType, ObjectType};
use crate::runner::ds::value::JsValue;
use crate::runner::eval::function::call_function;
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::{BuiltInObject, EvalContext};

pub const FUNCTION_PROTOTYPE: &str = "Function.prototype";

pub fn register(registry: &mut BuiltInRegistry) {
    let function_prototype = BuiltInObject::new(FUNCTION_PROTOTYPE)
        .on_function_prototype()
        .add_method("call", function_call)
        .add_method("apply", function_apply)
        .add_method("bind", function_bind);

    registry.register_object(function_prototype);
}

fn this_function(this: &JsValue, method: &str) -> Result<JsObjectType, JErrorType> {
    match this {
        JsValue::Object(o) if (**o).borrow().is_callable() => Ok(o.clone()),
        _ => Err(JErrorType::TypeError(format!(
            "Function.prototype.{} called on a value that is not a function",
            method
        ))),
    }
}

fn split_receiver(mut args: Vec<JsValue>) -> (JsValue, Vec<JsValue>) {
    if args.is_empty() {
        (JsValue::Undefined, args)
    } else {
        let receiver = args.remove(0);
        (receiver, args)
    }
}

/// fn.call(thisArg, ...args)
fn function_call(
    ctx: &mut EvalContext,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let function = this_function(&this, "call")?;
    let (receiver, rest) = split_receiver(args);
    call_function(
        ctx,
        &function,
        CallForm::Explicit {
            receiver,
            via: ExplicitVia::Call,
        },
        rest,
    )
}

/// fn.apply(thisArg, argsArray). The argument list may be an array, `undefined` or `null`.
fn function_apply(
    ctx: &mut EvalContext,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let function = this_function(&this, "apply")?;
    let mut args = args.into_iter();
    let receiver = args.next().unwrap_or(JsValue::Undefined);
    let spread = match args.next() {
        None | Some(JsValue::Undefined) | Some(JsValue::Null) => vec![],
        Some(JsValue::Object(o)) => array_elements(&o).ok_or_else(apply_list_error)?,
        Some(_) => return Err(apply_list_error()),
    };
    call_function(
        ctx,
        &function,
        CallForm::Explicit {
            receiver,
            via: ExplicitVia::Apply,
        },
        spread,
    )
}

fn array_elements(o: &JsObjectType) -> Option<Vec<JsValue>> {
    match &*(**o).borrow() {
        ObjectType::Array(a) => Some(a.elements.clone()),
        _ => None,
    }
}

fn apply_list_error() -> JErrorType {
    JErrorType::TypeError("CreateListFromArrayLike called on non-object".to_string())
}

/// fn.bind(thisArg, ...args) returns a new function whose receiver can no longer change.
fn function_bind(
    ctx: &mut EvalContext,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let target = this_function(&this, "bind")?;
    let (target_name, constructable) = match (*target).borrow().as_function() {
        Some(f) => (f.name.clone(), f.is_constructor()),
        None => (String::new(), false),
    };
    let (bound_this, bound_args) = split_receiver(args);
    let bound = JsFunctionObject::new_bound_function(
        target,
        &target_name,
        constructable,
        bound_this,
        bound_args,
        Some(ctx.function_prototype.clone()),
    );
    Ok(JsValue::Object(new_js_object(ObjectType::Function(bound))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receiver_is_split_from_arguments() {
        let (receiver, rest) = split_receiver(vec![JsValue::from(1), JsValue::from(2)]);
        assert_eq!(receiver, JsValue::from(1));
        assert_eq!(rest, vec![JsValue::from(2)]);
        let (receiver, rest) = split_receiver(vec![]);
        assert_eq!(receiver, JsValue::Undefined);
        assert!(rest.is_empty());
    }

    #[test]
    fn non_functions_are_rejected() {
        let mut ctx = EvalContext::new();
        let err = function_call(&mut ctx, JsValue::from(3), vec![]).unwrap_err();
        assert!(matches!(err, JErrorType::TypeError(_)));
    }
}
