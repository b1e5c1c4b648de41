//! Tests for the expression evaluator.
//!
//! These build AST nodes by hand and evaluate them in a fresh [`EvalContext`], covering the
//! operators the binding scripts lean on.

extern crate this_binding;

use this_binding::parser::ast::{
    BinaryOperator, ExpressionType, LiteralData, LiteralType, LogicalOperator, Meta,
    NumberLiteralType, UnaryOperator,
};
use this_binding::runner::ds::operations::type_conversion::to_boolean;
use this_binding::runner::ds::value::{JsNumberType, JsValue};
use this_binding::runner::eval::expression::evaluate_expression;
use this_binding::runner::plugin::registry::BuiltInRegistry;
use this_binding::runner::plugin::types::EvalContext;

/// Helper to create a simple meta for tests.
fn test_meta() -> Meta {
    Meta {
        start_index: 0,
        end_index: 0,
    }
}

fn num_expr(n: i64) -> ExpressionType {
    ExpressionType::Literal(LiteralData {
        meta: test_meta(),
        value: LiteralType::NumberLiteral(NumberLiteralType::IntegerLiteral(n)),
    })
}

fn float_expr(f: f64) -> ExpressionType {
    ExpressionType::Literal(LiteralData {
        meta: test_meta(),
        value: LiteralType::NumberLiteral(NumberLiteralType::FloatLiteral(f)),
    })
}

fn str_expr(s: &str) -> ExpressionType {
    ExpressionType::Literal(LiteralData {
        meta: test_meta(),
        value: LiteralType::StringLiteral(s.to_string()),
    })
}

fn bool_expr(b: bool) -> ExpressionType {
    ExpressionType::Literal(LiteralData {
        meta: test_meta(),
        value: LiteralType::BooleanLiteral(b),
    })
}

fn null_expr() -> ExpressionType {
    ExpressionType::Literal(LiteralData {
        meta: test_meta(),
        value: LiteralType::NullLiteral,
    })
}

fn ident_expr(name: &str) -> ExpressionType {
    ExpressionType::Identifier(this_binding::parser::ast::IdentifierData {
        name: name.to_string(),
        meta: test_meta(),
    })
}

fn this_expr() -> ExpressionType {
    ExpressionType::ThisExpression { meta: test_meta() }
}

fn binary_expr(op: BinaryOperator, left: ExpressionType, right: ExpressionType) -> ExpressionType {
    ExpressionType::BinaryExpression {
        meta: test_meta(),
        operator: op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn unary_expr(op: UnaryOperator, arg: ExpressionType) -> ExpressionType {
    ExpressionType::UnaryExpression {
        meta: test_meta(),
        operator: op,
        argument: Box::new(arg),
    }
}

fn logical_expr(op: LogicalOperator, left: ExpressionType, right: ExpressionType) -> ExpressionType {
    ExpressionType::LogicalExpression {
        meta: test_meta(),
        operator: op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn cond_expr(test: ExpressionType, consequent: ExpressionType, alternate: ExpressionType) -> ExpressionType {
    ExpressionType::ConditionalExpression {
        meta: test_meta(),
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
    }
}

fn eval(expr: &ExpressionType) -> JsValue {
    let mut ctx = EvalContext::new();
    evaluate_expression(expr, &mut ctx).unwrap()
}

// ============================================================================
// Literal tests
// ============================================================================

#[test]
fn test_number_literal() {
    assert_eq!(eval(&num_expr(42)), JsValue::Number(JsNumberType::Integer(42)));
}

#[test]
fn test_float_literal() {
    match eval(&float_expr(2.5)) {
        JsValue::Number(JsNumberType::Float(f)) => assert!((f - 2.5).abs() < 0.001),
        other => panic!("Expected float, got {:?}", other),
    }
}

#[test]
fn test_string_literal() {
    assert_eq!(eval(&str_expr("hello")), JsValue::String("hello".to_string()));
}

#[test]
fn test_boolean_and_null_literals() {
    assert_eq!(eval(&bool_expr(true)), JsValue::Boolean(true));
    assert_eq!(eval(&bool_expr(false)), JsValue::Boolean(false));
    assert_eq!(eval(&null_expr()), JsValue::Null);
}

// ============================================================================
// Receiver and identifier tests
// ============================================================================

#[test]
fn test_this_at_top_level_is_global_object() {
    let mut ctx = EvalContext::new();
    let this = evaluate_expression(&this_expr(), &mut ctx).unwrap();
    assert_eq!(this, ctx.global_this());
    let window = evaluate_expression(&ident_expr("window"), &mut ctx).unwrap();
    assert_eq!(this, window);
}

#[test]
fn test_undeclared_identifier_is_reference_error() {
    let mut ctx = EvalContext::new();
    let err = evaluate_expression(&ident_expr("nope"), &mut ctx).unwrap_err();
    assert_eq!(err.to_string(), "Uncaught reference error: nope is not defined.");
}

#[test]
fn test_typeof_undeclared_is_undefined() {
    let expr = unary_expr(UnaryOperator::TypeOf, ident_expr("nope"));
    assert_eq!(eval(&expr), JsValue::from("undefined"));
}

#[test]
fn test_typeof_values() {
    assert_eq!(eval(&unary_expr(UnaryOperator::TypeOf, this_expr())), JsValue::from("object"));
    assert_eq!(eval(&unary_expr(UnaryOperator::TypeOf, null_expr())), JsValue::from("object"));
    assert_eq!(eval(&unary_expr(UnaryOperator::TypeOf, num_expr(1))), JsValue::from("number"));
    assert_eq!(eval(&unary_expr(UnaryOperator::TypeOf, str_expr("s"))), JsValue::from("string"));
}

#[test]
fn test_typeof_builtin_method_is_function() {
    let mut ctx = EvalContext::new();
    ctx.install_core_builtins(BuiltInRegistry::with_core());
    let log = ExpressionType::MemberExpression(
        this_binding::parser::ast::MemberExpressionType::SimpleMemberExpression {
            meta: test_meta(),
            object: Box::new(ident_expr("console")),
            property: this_binding::parser::ast::IdentifierData {
                name: "log".to_string(),
                meta: test_meta(),
            },
        },
    );
    let result = evaluate_expression(&unary_expr(UnaryOperator::TypeOf, log), &mut ctx).unwrap();
    assert_eq!(result, JsValue::from("function"));
}

// ============================================================================
// Operator tests
// ============================================================================

#[test]
fn test_addition() {
    let sum = binary_expr(BinaryOperator::Add, num_expr(1), num_expr(2));
    assert_eq!(eval(&sum), JsValue::Number(JsNumberType::Integer(3)));
    let concat = binary_expr(BinaryOperator::Add, str_expr("hello"), str_expr(" world"));
    assert_eq!(eval(&concat), JsValue::from("hello world"));
    let mixed = binary_expr(BinaryOperator::Add, num_expr(1), str_expr("2"));
    assert_eq!(eval(&mixed), JsValue::from("12"));
}

#[test]
fn test_subtraction_and_multiplication() {
    let diff = binary_expr(BinaryOperator::Subtract, num_expr(5), num_expr(3));
    assert_eq!(eval(&diff), JsValue::Number(JsNumberType::Integer(2)));
    let product = binary_expr(BinaryOperator::Multiply, num_expr(4), num_expr(3));
    assert_eq!(eval(&product), JsValue::Number(JsNumberType::Integer(12)));
}

#[test]
fn test_division_is_floating_point() {
    let quotient = binary_expr(BinaryOperator::Divide, num_expr(7), num_expr(2));
    assert_eq!(eval(&quotient), JsValue::Number(JsNumberType::Float(3.5)));
    let by_zero = binary_expr(BinaryOperator::Divide, num_expr(1), num_expr(0));
    assert_eq!(eval(&by_zero), JsValue::Number(JsNumberType::PositiveInfinity));
}

#[test]
fn test_negation() {
    let negated = unary_expr(UnaryOperator::Minus, num_expr(5));
    assert_eq!(eval(&negated), JsValue::Number(JsNumberType::Integer(-5)));
    let not = unary_expr(UnaryOperator::LogicalNot, str_expr(""));
    assert_eq!(eval(&not), JsValue::Boolean(true));
}

#[test]
fn test_strict_and_loose_equality() {
    let strict = binary_expr(BinaryOperator::StrictlyEqual, num_expr(1), str_expr("1"));
    assert_eq!(eval(&strict), JsValue::Boolean(false));
    let loose = binary_expr(BinaryOperator::LooselyEqual, num_expr(1), str_expr("1"));
    assert_eq!(eval(&loose), JsValue::Boolean(true));
    let nullish = binary_expr(
        BinaryOperator::LooselyEqual,
        null_expr(),
        ident_expr("undefined"),
    );
    assert_eq!(eval(&nullish), JsValue::Boolean(true));
}

#[test]
fn test_relational() {
    let less = binary_expr(BinaryOperator::LessThan, num_expr(1), num_expr(2));
    assert_eq!(eval(&less), JsValue::Boolean(true));
    let strings = binary_expr(BinaryOperator::GreaterThan, str_expr("b"), str_expr("a"));
    assert_eq!(eval(&strings), JsValue::Boolean(true));
}

#[test]
fn test_logical_short_circuit() {
    // The right side would throw if evaluated.
    let or = logical_expr(LogicalOperator::Or, str_expr("left"), ident_expr("nope"));
    assert_eq!(eval(&or), JsValue::from("left"));
    let and = logical_expr(LogicalOperator::And, num_expr(0), ident_expr("nope"));
    assert_eq!(eval(&and), JsValue::Number(JsNumberType::Integer(0)));
}

#[test]
fn test_conditional() {
    let expr = cond_expr(bool_expr(false), str_expr("yes"), str_expr("no"));
    assert_eq!(eval(&expr), JsValue::from("no"));
}

#[test]
fn test_truthiness() {
    assert!(!to_boolean(&JsValue::Undefined));
    assert!(!to_boolean(&JsValue::Number(JsNumberType::NaN)));
    assert!(to_boolean(&JsValue::from("0")));
    assert!(to_boolean(&eval(&this_expr())));
}
