//! Function instantiation and invocation.

use std::rc::Rc;

use crate::parser::ast::{FunctionBodyOrExpression, FunctionData};
use crate::runner::binding::{complete_construct, resolve, CallForm, ExplicitVia, Invocation};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::execution_context::ExecutionContext;
use crate::runner::ds::function_object::{FunctionCode, JsFunctionObject};
use crate::runner::ds::lex_env::JsLexEnvironmentType;
use crate::runner::ds::object::{new_js_object, object_create, JsObjectType, ObjectType};
use crate::runner::ds::operations::lex_env::new_declarative_environment;
use crate::runner::ds::operations::object::{put, PROPERTY_PROTOTYPE};
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::types::EvalContext;

use super::expression::evaluate_expression;
use super::statement::execute_function_body;
use super::types::{CompletionType, ValueResult};

/// Creates a function object for a declaration or expression, closing over the running
/// lexical environment. Arrow functions also capture the running frame's receiver.
pub fn instantiate_function(
    data: &Rc<FunctionData>,
    inferred_name: Option<&str>,
    ctx: &mut EvalContext,
) -> JsValue {
    let name = data
        .id
        .as_ref()
        .map(|id| id.name.clone())
        .or_else(|| inferred_name.map(|n| n.to_string()))
        .unwrap_or_default();
    let strict = ctx.is_strict() || data.has_strict_body();
    let environment = ctx.lexical_environment();
    let function_prototype = Some(ctx.function_prototype.clone());

    if data.is_arrow {
        let captured_this = ctx.current_this();
        return JsValue::Object(new_js_object(ObjectType::Function(
            JsFunctionObject::new_arrow_function(
                name,
                data.clone(),
                environment,
                strict,
                captured_this,
                function_prototype,
            ),
        )));
    }

    let function = new_js_object(ObjectType::Function(JsFunctionObject::new_normal_function(
        name,
        data.clone(),
        environment,
        strict,
        function_prototype,
    )));
    put(
        &function,
        PROPERTY_PROTOTYPE,
        JsValue::Object(object_create(None)),
    );
    JsValue::Object(function)
}

/// Like [`instantiate_function`], but a named function expression can also refer to
/// itself by its own name.
pub fn instantiate_function_expression(
    data: &Rc<FunctionData>,
    inferred_name: Option<&str>,
    ctx: &mut EvalContext,
) -> JsValue {
    let own_name = match &data.id {
        Some(id) if !data.is_arrow => id.name.clone(),
        _ => return instantiate_function(data, inferred_name, ctx),
    };
    let previous = ctx.push_block_scope();
    let function = instantiate_function(data, inferred_name, ctx);
    let _ = ctx.declare_lexical(&own_name, function.clone(), false);
    ctx.pop_block_scope(previous);
    function
}

/// Invokes `function` with the given call form. Resolves the receiver, runs the code and
/// applies constructor completion for `new`.
pub fn call_function(
    ctx: &mut EvalContext,
    function: &JsObjectType,
    form: CallForm,
    args: Vec<JsValue>,
) -> ValueResult {
    let (resolution, code, name, strict) = {
        let obj = (**function).borrow();
        let callee = match obj.as_function() {
            Some(f) => f,
            None => {
                return Err(JErrorType::TypeError(format!(
                    "{} is not a function",
                    obj.describe()
                )))
            }
        };
        if form.is_construct() && !callee.is_constructor() {
            return Err(JErrorType::TypeError(format!(
                "{} is not a constructor",
                display_name(&callee.name)
            )));
        }
        let env = ctx.binding_environment();
        let resolution = resolve(
            &Invocation {
                callee,
                form: &form,
                arguments: &args,
            },
            &env,
        );
        (
            resolution,
            callee.code.clone(),
            callee.name.clone(),
            callee.strict,
        )
    };

    let returned = match code {
        FunctionCode::Native(native) => {
            tracing::debug!(
                callee = %display_name(&name),
                form = %form,
                rule = %resolution.rule,
                "resolved receiver"
            );
            native(ctx, resolution.this_value.clone(), args)?
        }
        FunctionCode::Bound { target, bound_args } => {
            tracing::debug!(
                callee = %name,
                form = %form,
                rule = %resolution.rule,
                "resolved receiver"
            );
            let mut forwarded = bound_args;
            forwarded.extend(args);
            call_function(
                ctx,
                &target,
                CallForm::Explicit {
                    receiver: resolution.this_value.clone(),
                    via: ExplicitVia::BoundTarget,
                },
                forwarded,
            )?
        }
        FunctionCode::Script { data, environment } => {
            let local_env = bind_parameters(&data, environment, &args);
            let frame = ExecutionContext::new(
                name.clone(),
                resolution.this_value.clone(),
                local_env,
                strict,
            );
            tracing::debug!(
                frame_id = %frame.id,
                callee = %display_name(&name),
                form = %form,
                rule = %resolution.rule,
                "resolved receiver"
            );
            ctx.push_execution_ctx(frame)?;
            let result = run_function_code(&data, ctx);
            ctx.pop_execution_ctx();
            result?
        }
    };

    if form.is_construct() {
        Ok(complete_construct(&resolution, returned))
    } else {
        Ok(returned)
    }
}

fn bind_parameters(
    data: &FunctionData,
    environment: JsLexEnvironmentType,
    args: &[JsValue],
) -> JsLexEnvironmentType {
    let local_env = new_declarative_environment(Some(environment));
    {
        let mut env = (*local_env).borrow_mut();
        let record = env.inner.as_env_record_mut();
        for (index, param) in data.params.iter().enumerate() {
            record.create_mutable_binding(param.name.clone());
            record.initialize_binding(
                param.name.clone(),
                args.get(index).cloned().unwrap_or(JsValue::Undefined),
            );
        }
    }
    local_env
}

fn run_function_code(data: &FunctionData, ctx: &mut EvalContext) -> ValueResult {
    match &data.body {
        FunctionBodyOrExpression::FunctionBody(body) => {
            let completion = execute_function_body(body, ctx)?;
            Ok(match completion.completion_type {
                CompletionType::Return => completion.get_value(),
                CompletionType::Normal => JsValue::Undefined,
            })
        }
        FunctionBodyOrExpression::Expression(expression) => evaluate_expression(expression, ctx),
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "anonymous"
    } else {
        name
    }
}

/// Check if a value is callable.
pub fn is_callable(value: &JsValue) -> bool {
    match value {
        JsValue::Object(o) => (**o).borrow().is_callable(),
        _ => false,
    }
}

/// Check if a value is a constructor.
pub fn is_constructor(value: &JsValue) -> bool {
    match value {
        JsValue::Object(o) => (**o)
            .borrow()
            .as_function()
            .map(|f| f.is_constructor())
            .unwrap_or(false),
        _ => false,
    }
}
