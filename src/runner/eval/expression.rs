//! Expression evaluation.
//!
//! Call expressions are where receivers come from: the syntactic shape of the callee picks
//! the [`CallForm`] handed to the binding resolver.

use crate::parser::ast::{
    BinaryOperator, ExpressionType, LiteralData, LiteralType, LogicalOperator,
    MemberExpressionType, NumberLiteralType, PropertyData, TemplateLiteralData, UnaryOperator,
};
use crate::runner::binding::CallForm;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::{array_create, object_create};
use crate::runner::ds::operations::object::put;
use crate::runner::ds::operations::test_and_comparison::{is_loosely_equal, is_strictly_equal};
use crate::runner::ds::operations::type_conversion::{
    to_boolean, to_number, to_property_key, to_string, type_of, TYPE_STR_UNDEFINED,
};
use crate::runner::ds::value::{JsNumberType, JsValue};
use crate::runner::plugin::types::EvalContext;

use super::function::{
    call_function, instantiate_function, instantiate_function_expression, is_callable,
    is_constructor,
};
use super::types::{Reference, ReferenceResult, ValueResult};

/// Evaluate an expression and return its value.
pub fn evaluate_expression(expr: &ExpressionType, ctx: &mut EvalContext) -> ValueResult {
    match expr {
        ExpressionType::Literal(lit) => Ok(evaluate_literal(lit)),

        ExpressionType::Identifier(id) => ctx.get_binding(&id.name),

        ExpressionType::ThisExpression { .. } => Ok(ctx.current_this()),

        ExpressionType::ArrayExpression { elements, .. } => {
            let mut values = Vec::with_capacity(elements.len());
            for element in elements {
                values.push(evaluate_expression(element, ctx)?);
            }
            Ok(JsValue::Object(array_create(values)))
        }

        ExpressionType::ObjectExpression { properties, .. } => {
            evaluate_object_expression(properties, ctx)
        }

        ExpressionType::FunctionExpression(data) => {
            Ok(instantiate_function_expression(data, None, ctx))
        }

        ExpressionType::ArrowFunctionExpression(data) => Ok(instantiate_function(data, None, ctx)),

        ExpressionType::TemplateLiteral(data) => evaluate_template_literal(data, ctx),

        ExpressionType::UnaryExpression {
            operator, argument, ..
        } => evaluate_unary_expression(operator, argument, ctx),

        ExpressionType::BinaryExpression {
            operator,
            left,
            right,
            ..
        } => evaluate_binary_expression(operator, left, right, ctx),

        ExpressionType::LogicalExpression {
            operator,
            left,
            right,
            ..
        } => evaluate_logical_expression(operator, left, right, ctx),

        ExpressionType::ConditionalExpression {
            test,
            consequent,
            alternate,
            ..
        } => {
            let test_val = evaluate_expression(test, ctx)?;
            if to_boolean(&test_val) {
                evaluate_expression(consequent, ctx)
            } else {
                evaluate_expression(alternate, ctx)
            }
        }

        ExpressionType::AssignmentExpression { left, right, .. } => {
            evaluate_assignment_expression(left, right, ctx)
        }

        ExpressionType::SequenceExpression { expressions, .. } => {
            let mut result = JsValue::Undefined;
            for expr in expressions {
                result = evaluate_expression(expr, ctx)?;
            }
            Ok(result)
        }

        ExpressionType::MemberExpression(member) => {
            let reference = evaluate_member_reference(member, ctx)?;
            reference.get_value(ctx)
        }

        ExpressionType::CallExpression {
            callee, arguments, ..
        } => evaluate_call_expression(callee, arguments, ctx),

        ExpressionType::NewExpression {
            callee, arguments, ..
        } => evaluate_new_expression(callee, arguments, ctx),
    }
}

/// Evaluates `expr`, naming it `name` if it is an anonymous function definition.
pub fn evaluate_named_expression(
    expr: &ExpressionType,
    name: &str,
    ctx: &mut EvalContext,
) -> ValueResult {
    match expr {
        ExpressionType::FunctionExpression(data) if data.id.is_none() => {
            Ok(instantiate_function_expression(data, Some(name), ctx))
        }
        ExpressionType::ArrowFunctionExpression(data) => {
            Ok(instantiate_function(data, Some(name), ctx))
        }
        _ => evaluate_expression(expr, ctx),
    }
}

fn evaluate_literal(lit: &LiteralData) -> JsValue {
    match &lit.value {
        LiteralType::NullLiteral => JsValue::Null,
        LiteralType::BooleanLiteral(b) => JsValue::Boolean(*b),
        LiteralType::StringLiteral(s) => JsValue::String(s.clone()),
        LiteralType::NumberLiteral(n) => match n {
            NumberLiteralType::IntegerLiteral(i) => JsValue::Number(JsNumberType::Integer(*i)),
            NumberLiteralType::FloatLiteral(f) => JsValue::Number(JsNumberType::from_f64(*f)),
        },
    }
}

fn evaluate_object_expression(properties: &[PropertyData], ctx: &mut EvalContext) -> ValueResult {
    let object = object_create(None);
    for property in properties {
        let value = evaluate_named_expression(&property.value, &property.key, ctx)?;
        put(&object, &property.key, value);
    }
    Ok(JsValue::Object(object))
}

fn evaluate_template_literal(data: &TemplateLiteralData, ctx: &mut EvalContext) -> ValueResult {
    let mut cooked = String::new();
    for (index, quasi) in data.quasis.iter().enumerate() {
        cooked.push_str(quasi);
        if let Some(expression) = data.expressions.get(index) {
            let value = evaluate_expression(expression, ctx)?;
            cooked.push_str(&to_string(&value));
        }
    }
    Ok(JsValue::String(cooked))
}

/// Resolves an identifier or member expression to a [`Reference`].
pub fn evaluate_reference(expr: &ExpressionType, ctx: &mut EvalContext) -> ReferenceResult {
    match expr {
        ExpressionType::Identifier(id) => Ok(Reference::binding(id.name.clone(), ctx.is_strict())),
        ExpressionType::MemberExpression(member) => evaluate_member_reference(member, ctx),
        _ => Err(JErrorType::SyntaxError(
            "Invalid left-hand side in assignment".to_string(),
        )),
    }
}

fn evaluate_member_reference(
    member: &MemberExpressionType,
    ctx: &mut EvalContext,
) -> ReferenceResult {
    let (base, key) = match member {
        MemberExpressionType::SimpleMemberExpression {
            object, property, ..
        } => (evaluate_expression(object, ctx)?, property.name.clone()),
        MemberExpressionType::ComputedMemberExpression {
            object, property, ..
        } => {
            let base = evaluate_expression(object, ctx)?;
            let key = evaluate_expression(property, ctx)?;
            (base, to_property_key(&key))
        }
    };
    Ok(Reference::property(base, key, ctx.is_strict()))
}

fn evaluate_arguments(arguments: &[ExpressionType], ctx: &mut EvalContext) -> Result<Vec<JsValue>, JErrorType> {
    let mut values = Vec::with_capacity(arguments.len());
    for argument in arguments {
        values.push(evaluate_expression(argument, ctx)?);
    }
    Ok(values)
}

/// `callee(args)`: a member callee makes a method call on its base, anything else is a
/// plain call.
fn evaluate_call_expression(
    callee: &ExpressionType,
    arguments: &[ExpressionType],
    ctx: &mut EvalContext,
) -> ValueResult {
    let (function_value, form) = match callee {
        ExpressionType::MemberExpression(member) => {
            let reference = evaluate_member_reference(member, ctx)?;
            let function_value = reference.get_value(ctx)?;
            let base = reference.get_this_value().unwrap_or(JsValue::Undefined);
            (function_value, CallForm::Method { base })
        }
        _ => (evaluate_expression(callee, ctx)?, CallForm::Plain),
    };
    let args = evaluate_arguments(arguments, ctx)?;
    match &function_value {
        JsValue::Object(function) if is_callable(&function_value) => {
            call_function(ctx, function, form, args)
        }
        _ => Err(JErrorType::TypeError(format!(
            "{} is not a function",
            describe_callee(callee)
        ))),
    }
}

fn evaluate_new_expression(
    callee: &ExpressionType,
    arguments: &[ExpressionType],
    ctx: &mut EvalContext,
) -> ValueResult {
    let constructor = evaluate_expression(callee, ctx)?;
    let args = evaluate_arguments(arguments, ctx)?;
    match &constructor {
        JsValue::Object(function) if is_constructor(&constructor) => {
            call_function(ctx, function, CallForm::Constructor, args)
        }
        _ => Err(JErrorType::TypeError(format!(
            "{} is not a constructor",
            describe_callee(callee)
        ))),
    }
}

/// Source-like rendering of a callee for error messages, e.g. `me.age`.
pub fn describe_callee(expr: &ExpressionType) -> String {
    match expr {
        ExpressionType::Identifier(id) => id.name.clone(),
        ExpressionType::ThisExpression { .. } => "this".to_string(),
        ExpressionType::MemberExpression(MemberExpressionType::SimpleMemberExpression {
            object,
            property,
            ..
        }) => format!("{}.{}", describe_callee(object), property.name),
        ExpressionType::MemberExpression(MemberExpressionType::ComputedMemberExpression {
            object,
            property,
            ..
        }) => match property.as_ref() {
            ExpressionType::Literal(LiteralData {
                value: LiteralType::StringLiteral(s),
                ..
            }) => format!("{}[\"{}\"]", describe_callee(object), s),
            _ => format!("{}[...]", describe_callee(object)),
        },
        ExpressionType::CallExpression { callee, .. } => format!("{}(...)", describe_callee(callee)),
        ExpressionType::Literal(lit) => to_string(&evaluate_literal(lit)),
        _ => "expression".to_string(),
    }
}

fn evaluate_assignment_expression(
    left: &ExpressionType,
    right: &ExpressionType,
    ctx: &mut EvalContext,
) -> ValueResult {
    let reference = evaluate_reference(left, ctx)?;
    let value = match left {
        ExpressionType::Identifier(id) => evaluate_named_expression(right, &id.name, ctx)?,
        _ => evaluate_expression(right, ctx)?,
    };
    reference.put_value(value.clone(), ctx)?;
    Ok(value)
}

fn evaluate_unary_expression(
    operator: &UnaryOperator,
    argument: &ExpressionType,
    ctx: &mut EvalContext,
) -> ValueResult {
    match operator {
        UnaryOperator::TypeOf => {
            if let ExpressionType::Identifier(id) = argument {
                if !ctx.has_binding(&id.name) {
                    return Ok(JsValue::from(TYPE_STR_UNDEFINED));
                }
            }
            let value = evaluate_expression(argument, ctx)?;
            Ok(JsValue::from(type_of(&value)))
        }
        UnaryOperator::Void => {
            evaluate_expression(argument, ctx)?;
            Ok(JsValue::Undefined)
        }
        UnaryOperator::LogicalNot => {
            let value = evaluate_expression(argument, ctx)?;
            Ok(JsValue::Boolean(!to_boolean(&value)))
        }
        UnaryOperator::Minus => {
            let value = evaluate_expression(argument, ctx)?;
            Ok(JsValue::Number(negate_number(to_number(&value))))
        }
        UnaryOperator::Plus => {
            let value = evaluate_expression(argument, ctx)?;
            Ok(JsValue::Number(to_number(&value)))
        }
    }
}

fn negate_number(n: JsNumberType) -> JsNumberType {
    match n {
        JsNumberType::Integer(0) => JsNumberType::Float(-0.0),
        JsNumberType::Integer(i) => match i.checked_neg() {
            Some(negated) => JsNumberType::Integer(negated),
            None => JsNumberType::Float(-(i as f64)),
        },
        JsNumberType::Float(f) => JsNumberType::Float(-f),
        JsNumberType::PositiveInfinity => JsNumberType::NegativeInfinity,
        JsNumberType::NegativeInfinity => JsNumberType::PositiveInfinity,
        JsNumberType::NaN => JsNumberType::NaN,
    }
}

fn evaluate_binary_expression(
    operator: &BinaryOperator,
    left: &ExpressionType,
    right: &ExpressionType,
    ctx: &mut EvalContext,
) -> ValueResult {
    let left_val = evaluate_expression(left, ctx)?;
    let right_val = evaluate_expression(right, ctx)?;

    Ok(match operator {
        // Arithmetic
        BinaryOperator::Add => add_values(&left_val, &right_val),
        BinaryOperator::Subtract => {
            numeric_op(&left_val, &right_val, i64::checked_sub, |a, b| a - b)
        }
        BinaryOperator::Multiply => {
            numeric_op(&left_val, &right_val, i64::checked_mul, |a, b| a * b)
        }
        BinaryOperator::Divide => JsValue::Number(JsNumberType::from_f64(
            to_number(&left_val).as_f64() / to_number(&right_val).as_f64(),
        )),
        BinaryOperator::Modulo => {
            numeric_op(&left_val, &right_val, i64::checked_rem, |a, b| a % b)
        }

        // Comparison
        BinaryOperator::LessThan => compare_values(&left_val, &right_val, |o| o.is_lt()),
        BinaryOperator::GreaterThan => compare_values(&left_val, &right_val, |o| o.is_gt()),
        BinaryOperator::LessThanEqual => compare_values(&left_val, &right_val, |o| o.is_le()),
        BinaryOperator::GreaterThanEqual => compare_values(&left_val, &right_val, |o| o.is_ge()),

        // Equality
        BinaryOperator::StrictlyEqual => JsValue::Boolean(is_strictly_equal(&left_val, &right_val)),
        BinaryOperator::StrictlyUnequal => {
            JsValue::Boolean(!is_strictly_equal(&left_val, &right_val))
        }
        BinaryOperator::LooselyEqual => JsValue::Boolean(is_loosely_equal(&left_val, &right_val)),
        BinaryOperator::LooselyUnequal => {
            JsValue::Boolean(!is_loosely_equal(&left_val, &right_val))
        }
    })
}

/// Evaluate a logical expression with short-circuit evaluation.
fn evaluate_logical_expression(
    operator: &LogicalOperator,
    left: &ExpressionType,
    right: &ExpressionType,
    ctx: &mut EvalContext,
) -> ValueResult {
    let left_val = evaluate_expression(left, ctx)?;
    let short_circuit = match operator {
        LogicalOperator::And => !to_boolean(&left_val),
        LogicalOperator::Or => to_boolean(&left_val),
    };
    if short_circuit {
        Ok(left_val)
    } else {
        evaluate_expression(right, ctx)
    }
}

fn add_values(left: &JsValue, right: &JsValue) -> JsValue {
    let is_textual = |v: &JsValue| matches!(v, JsValue::String(_) | JsValue::Object(_));
    if is_textual(left) || is_textual(right) {
        return JsValue::String(format!("{}{}", to_string(left), to_string(right)));
    }
    numeric_op(left, right, i64::checked_add, |a, b| a + b)
}

/// Integer arithmetic while it stays exact, floating point otherwise.
fn numeric_op<F, G>(left: &JsValue, right: &JsValue, int_op: F, float_op: G) -> JsValue
where
    F: Fn(i64, i64) -> Option<i64>,
    G: Fn(f64, f64) -> f64,
{
    let left_num = to_number(left);
    let right_num = to_number(right);
    if let (JsNumberType::Integer(a), JsNumberType::Integer(b)) = (&left_num, &right_num) {
        if let Some(result) = int_op(*a, *b) {
            return JsValue::Number(JsNumberType::Integer(result));
        }
    }
    JsValue::Number(JsNumberType::from_f64(float_op(
        left_num.as_f64(),
        right_num.as_f64(),
    )))
}

fn compare_values<F>(left: &JsValue, right: &JsValue, accept: F) -> JsValue
where
    F: Fn(std::cmp::Ordering) -> bool,
{
    let ordering = match (left, right) {
        (JsValue::String(a), JsValue::String(b)) => Some(a.cmp(b)),
        _ => to_number(left).as_f64().partial_cmp(&to_number(right).as_f64()),
    };
    JsValue::Boolean(ordering.map(accept).unwrap_or(false))
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn num(i: i64) -> JsValue {
        JsValue::Number(JsNumberType::Integer(i))
    }

    #[test]
    fn integer_overflow_falls_back_to_float() {
        let result = numeric_op(&num(i64::MAX), &num(1), i64::checked_add, |a, b| a + b);
        assert_eq!(
            result,
            JsValue::Number(JsNumberType::Float(i64::MAX as f64 + 1.0))
        );
    }

    #[test]
    fn modulo_by_zero_is_nan() {
        let result = numeric_op(&num(5), &num(0), i64::checked_rem, |a, b| a % b);
        assert_eq!(result, JsValue::Number(JsNumberType::NaN));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(
            add_values(&JsValue::from("a"), &num(1)),
            JsValue::from("a1")
        );
        assert_eq!(add_values(&num(2), &num(3)), num(5));
    }

    #[test]
    fn comparisons_with_nan_are_false() {
        let nan = JsValue::Number(JsNumberType::NaN);
        assert_eq!(compare_values(&nan, &num(1), |o| o.is_lt()), JsValue::Boolean(false));
        assert_eq!(
            compare_values(&JsValue::from("a"), &JsValue::from("b"), |o| o.is_lt()),
            JsValue::Boolean(true)
        );
    }
}
