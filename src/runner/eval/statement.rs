//! Statement execution.

use crate::parser::ast::{
    BlockStatementData, DeclarationType, FunctionBodyData, ProgramData, StatementType,
    VariableDeclarationData, VariableDeclarationKind,
};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::operations::type_conversion::to_boolean;
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::types::EvalContext;

use super::expression::{evaluate_expression, evaluate_named_expression};
use super::function::instantiate_function;
use super::types::{Completion, CompletionType, EvalResult, ValueResult};

/// Runs a whole script in the script frame: applies its strictness, hoists declarations and
/// returns the value of the last expression statement.
pub fn run_program(program: &ProgramData, ctx: &mut EvalContext) -> ValueResult {
    ctx.set_running_strict(program.strict);
    hoist_declarations(&program.body, ctx);
    let completion = execute_statement_list(&program.body, ctx)?;
    if completion.completion_type == CompletionType::Return {
        return Err(JErrorType::SyntaxError("Illegal return statement".to_string()));
    }
    Ok(completion.get_value())
}

/// Execute a statement and return its completion.
pub fn execute_statement(stmt: &StatementType, ctx: &mut EvalContext) -> EvalResult {
    match stmt {
        StatementType::EmptyStatement { .. } => Ok(Completion::normal()),

        StatementType::ExpressionStatement { expression, .. } => {
            let value = evaluate_expression(expression, ctx)?;
            Ok(Completion::normal_with_value(value))
        }

        StatementType::BlockStatement(block) => execute_block_statement(block, ctx),

        StatementType::DeclarationStatement(decl) => execute_declaration(decl, ctx),

        StatementType::IfStatement {
            test,
            consequent,
            alternate,
            ..
        } => {
            let test_value = evaluate_expression(test, ctx)?;
            if to_boolean(&test_value) {
                execute_statement(consequent, ctx)
            } else if let Some(alternate) = alternate {
                execute_statement(alternate, ctx)
            } else {
                Ok(Completion::normal())
            }
        }

        StatementType::ReturnStatement { argument, .. } => {
            let value = if let Some(arg) = argument {
                evaluate_expression(arg, ctx)?
            } else {
                JsValue::Undefined
            };
            Ok(Completion::return_value(value))
        }
    }
}

/// Executes statements in order, stopping at the first `return`. The completion value is
/// that of the last statement which produced one.
pub fn execute_statement_list(statements: &[StatementType], ctx: &mut EvalContext) -> EvalResult {
    let mut last_value = None;
    for stmt in statements {
        let completion = execute_statement(stmt, ctx)?;
        if completion.is_abrupt() {
            return Ok(completion);
        }
        if completion.value.is_some() {
            last_value = completion.value;
        }
    }
    Ok(Completion::normal().update_empty(last_value))
}

/// Execute a block statement in a fresh block scope.
fn execute_block_statement(block: &BlockStatementData, ctx: &mut EvalContext) -> EvalResult {
    let previous = ctx.push_block_scope();
    hoist_block_functions(&block.body, ctx);
    let result = execute_statement_list(&block.body, ctx);
    ctx.pop_block_scope(previous);
    result
}

/// Runs a function body in the frame already pushed for the call.
pub fn execute_function_body(body: &FunctionBodyData, ctx: &mut EvalContext) -> EvalResult {
    hoist_declarations(&body.body, ctx);
    execute_statement_list(&body.body, ctx)
}

fn execute_declaration(decl: &DeclarationType, ctx: &mut EvalContext) -> EvalResult {
    match decl {
        // Instantiated while hoisting.
        DeclarationType::FunctionDeclaration(_) => Ok(Completion::normal()),
        DeclarationType::VariableDeclaration(var_decl) => {
            execute_variable_declaration(var_decl, ctx)?;
            Ok(Completion::normal())
        }
    }
}

fn execute_variable_declaration(
    var_decl: &VariableDeclarationData,
    ctx: &mut EvalContext,
) -> Result<(), JErrorType> {
    for declarator in &var_decl.declarations {
        let name = &declarator.id.name;
        let value = match &declarator.init {
            Some(init) => Some(evaluate_named_expression(init, name, ctx)?),
            None => None,
        };
        match var_decl.kind {
            VariableDeclarationKind::Var => {
                if let Some(value) = value {
                    ctx.set_binding(name, value)?;
                }
            }
            VariableDeclarationKind::Let => {
                ctx.declare_lexical(name, value.unwrap_or(JsValue::Undefined), true)?;
            }
            VariableDeclarationKind::Const => {
                ctx.declare_lexical(name, value.unwrap_or(JsValue::Undefined), false)?;
            }
        }
    }
    Ok(())
}

/// Declares every `var` name (including those nested in blocks and `if` branches) and
/// instantiates the top-level function declarations of a script or function body.
pub fn hoist_declarations(statements: &[StatementType], ctx: &mut EvalContext) {
    let mut var_names = Vec::new();
    collect_var_names(statements, &mut var_names);
    for name in var_names {
        ctx.declare_var(&name);
    }
    for stmt in statements {
        if let StatementType::DeclarationStatement(DeclarationType::FunctionDeclaration(data)) =
            stmt
        {
            let function = instantiate_function(data, None, ctx);
            if let Some(id) = &data.id {
                ctx.declare_function(&id.name, function);
            }
        }
    }
}

/// Function declarations inside a block are scoped to that block.
fn hoist_block_functions(statements: &[StatementType], ctx: &mut EvalContext) {
    for stmt in statements {
        if let StatementType::DeclarationStatement(DeclarationType::FunctionDeclaration(data)) =
            stmt
        {
            let function = instantiate_function(data, None, ctx);
            if let Some(id) = &data.id {
                ctx.declare_block_function(&id.name, function);
            }
        }
    }
}

fn collect_var_names(statements: &[StatementType], names: &mut Vec<String>) {
    for stmt in statements {
        match stmt {
            StatementType::DeclarationStatement(DeclarationType::VariableDeclaration(data))
                if data.kind == VariableDeclarationKind::Var =>
            {
                for declarator in &data.declarations {
                    if !names.contains(&declarator.id.name) {
                        names.push(declarator.id.name.clone());
                    }
                }
            }
            StatementType::BlockStatement(block) => collect_var_names(&block.body, names),
            StatementType::IfStatement {
                consequent,
                alternate,
                ..
            } => {
                collect_var_names(std::slice::from_ref(consequent.as_ref()), names);
                if let Some(alternate) = alternate {
                    collect_var_names(std::slice::from_ref(alternate.as_ref()), names);
                }
            }
            _ => {}
        }
    }
}
