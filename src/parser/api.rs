use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

use pest::error::{Error, ErrorVariant};
use pest::iterators::Pair;
use pest::Parser;
use pest::Span;
use pest_derive::Parser;

use super::ast::*;

#[derive(Parser)]
#[grammar = "parser/js_grammar.pest"] // relative to src
pub struct JsParser;

const TAB_WIDTH: usize = 2;
const USE_STRICT_DIRECTIVE: &str = "use strict";

pub type ParseResult<T> = Result<T, Error<Rule>>;

impl JsParser {
    /// Parses a complete script into its AST.
    pub fn parse_to_ast_from_str(script: &str) -> ParseResult<ProgramData> {
        parse_to_ast(script)
    }

    /// Renders the raw pest token tree, one token per line, indented by depth.
    pub fn parse_to_token_tree(script: &str) -> ParseResult<String> {
        parse_to_token_tree(script)
    }
}

pub fn parse_to_token_tree(script: &str) -> ParseResult<String> {
    let mut tree = vec![];
    for pair in JsParser::parse(Rule::script, script)? {
        tree.push(pair_to_string(pair, 0).join("\n"));
    }
    Ok(tree.join("\n"))
}

fn pair_to_string(pair: Pair<Rule>, level: usize) -> Vec<String> {
    let mut tree = vec![];
    let span = pair.as_span();
    let rule_name = format!(
        "{:?} => ({},{}) #{:?}",
        pair.as_rule(),
        span.start(),
        span.end(),
        span.as_str()
    );
    let string_pads = " ".repeat(level * TAB_WIDTH);
    tree.push(format!("{}{}", string_pads, rule_name));
    for child_pair in pair.into_inner() {
        tree.append(pair_to_string(child_pair, level + 1).as_mut());
    }
    tree
}

pub fn parse_to_ast(script: &str) -> ParseResult<ProgramData> {
    let start = Instant::now();
    let mut pairs = JsParser::parse(Rule::script, script)?;
    tracing::debug!(
        elapsed_us = start.elapsed().as_micros() as u64,
        bytes = script.len(),
        "parsed script"
    );
    match pairs.next() {
        Some(pair) => build_ast_from_script(pair),
        None => Err(Error::new_from_pos(
            ErrorVariant::CustomError {
                message: "Empty parse result".to_string(),
            },
            pest::Position::from_start(script),
        )),
    }
}

/// Children of a pair with the keyword tokens (`function`, `return`, ...) filtered out.
struct ChildPairs<'i> {
    span: Span<'i>,
    pairs: VecDeque<Pair<'i, Rule>>,
}

impl<'i> ChildPairs<'i> {
    fn of(pair: Pair<'i, Rule>) -> Self {
        let span = pair.as_span();
        let pairs = pair
            .into_inner()
            .filter(|p| !is_keyword_token(p.as_rule()))
            .collect();
        ChildPairs { span, pairs }
    }

    fn next(&mut self) -> Option<Pair<'i, Rule>> {
        self.pairs.pop_front()
    }

    fn expect(&mut self) -> ParseResult<Pair<'i, Rule>> {
        match self.pairs.pop_front() {
            Some(p) => Ok(p),
            None => Err(Error::new_from_span(
                ErrorVariant::CustomError {
                    message: "Unexpected end of production".to_string(),
                },
                self.span.clone(),
            )),
        }
    }

    fn peek_rule(&self) -> Option<Rule> {
        self.pairs.front().map(|p| p.as_rule())
    }
}

fn is_keyword_token(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::function_kw | Rule::return_kw | Rule::if_kw | Rule::else_kw | Rule::new_kw
    )
}

fn get_meta(pair: &Pair<Rule>) -> Meta {
    let span = pair.as_span();
    Meta {
        start_index: span.start(),
        end_index: span.end(),
    }
}

fn get_unexpected_error(id: i32, pair: &Pair<Rule>) -> Error<Rule> {
    let message = format!("Unexpected state reached [{:?}] - {}", pair.as_rule(), id);
    Error::new_from_span(ErrorVariant::CustomError { message }, pair.as_span())
}

fn get_custom_error(message: &str, span: Span) -> Error<Rule> {
    Error::new_from_span(
        ErrorVariant::CustomError {
            message: message.to_string(),
        },
        span,
    )
}

fn build_ast_from_script(pair: Pair<Rule>) -> ParseResult<ProgramData> {
    let meta = get_meta(&pair);
    let mut body = vec![];
    for inner_pair in pair.into_inner() {
        if inner_pair.as_rule() == Rule::EOI {
            continue;
        }
        body.push(build_ast_from_statement(inner_pair)?);
    }
    let strict = has_use_strict_directive(&body);
    Ok(ProgramData { meta, body, strict })
}

fn has_use_strict_directive(body: &[StatementType]) -> bool {
    for statement in body {
        match statement {
            StatementType::ExpressionStatement {
                expression:
                    ExpressionType::Literal(LiteralData {
                        value: LiteralType::StringLiteral(s),
                        ..
                    }),
                ..
            } => {
                if s == USE_STRICT_DIRECTIVE {
                    return true;
                }
            }
            _ => break,
        }
    }
    false
}

fn build_ast_from_statement_list(
    children: &mut ChildPairs,
) -> ParseResult<Vec<StatementType>> {
    let mut statements = vec![];
    while let Some(pair) = children.next() {
        statements.push(build_ast_from_statement(pair)?);
    }
    Ok(statements)
}

fn build_ast_from_statement(pair: Pair<Rule>) -> ParseResult<StatementType> {
    let meta = get_meta(&pair);
    Ok(match pair.as_rule() {
        Rule::empty_statement => StatementType::EmptyStatement { meta },
        Rule::expression_statement => {
            let mut children = ChildPairs::of(pair);
            StatementType::ExpressionStatement {
                meta,
                expression: build_ast_from_expression(children.expect()?)?,
            }
        }
        Rule::block_statement => {
            let mut children = ChildPairs::of(pair);
            StatementType::BlockStatement(BlockStatementData {
                meta,
                body: build_ast_from_statement_list(&mut children)?,
            })
        }
        Rule::variable_statement => StatementType::DeclarationStatement(
            DeclarationType::VariableDeclaration(build_ast_from_variable_statement(pair)?),
        ),
        Rule::function_declaration => StatementType::DeclarationStatement(
            DeclarationType::FunctionDeclaration(Rc::new(build_ast_from_function(pair)?)),
        ),
        Rule::if_statement => {
            let mut children = ChildPairs::of(pair);
            let test = build_ast_from_expression(children.expect()?)?;
            let consequent = Box::new(build_ast_from_statement(children.expect()?)?);
            let alternate = match children.next() {
                Some(p) => Some(Box::new(build_ast_from_statement(p)?)),
                None => None,
            };
            StatementType::IfStatement {
                meta,
                test,
                consequent,
                alternate,
            }
        }
        Rule::return_statement => {
            let mut children = ChildPairs::of(pair);
            let argument = match children.next() {
                Some(p) => Some(build_ast_from_expression(p)?),
                None => None,
            };
            StatementType::ReturnStatement { meta, argument }
        }
        _ => return Err(get_unexpected_error(1, &pair)),
    })
}

fn build_ast_from_variable_statement(pair: Pair<Rule>) -> ParseResult<VariableDeclarationData> {
    let meta = get_meta(&pair);
    let mut children = ChildPairs::of(pair);
    let kind_pair = children.expect()?;
    let kind = match kind_pair.as_str() {
        "var" => VariableDeclarationKind::Var,
        "let" => VariableDeclarationKind::Let,
        "const" => VariableDeclarationKind::Const,
        _ => return Err(get_unexpected_error(2, &kind_pair)),
    };
    let mut declarations = vec![];
    while let Some(declaration_pair) = children.next() {
        let declaration_span = declaration_pair.as_span();
        let declarator = build_ast_from_variable_declaration(declaration_pair)?;
        if kind == VariableDeclarationKind::Const && declarator.init.is_none() {
            return Err(get_custom_error(
                "Missing initializer in const declaration",
                declaration_span,
            ));
        }
        declarations.push(declarator);
    }
    Ok(VariableDeclarationData {
        meta,
        kind,
        declarations,
    })
}

fn build_ast_from_variable_declaration(pair: Pair<Rule>) -> ParseResult<VariableDeclaratorData> {
    let meta = get_meta(&pair);
    let mut children = ChildPairs::of(pair);
    let id = build_identifier(&children.expect()?);
    let init = match children.next() {
        Some(p) => Some(build_ast_from_expression(p)?),
        None => None,
    };
    Ok(VariableDeclaratorData { meta, id, init })
}

fn build_identifier(pair: &Pair<Rule>) -> IdentifierData {
    IdentifierData {
        name: pair.as_str().to_string(),
        meta: get_meta(pair),
    }
}

/// Builds function declarations, function expressions and shorthand methods.
fn build_ast_from_function(pair: Pair<Rule>) -> ParseResult<FunctionData> {
    let meta = get_meta(&pair);
    let is_method = pair.as_rule() == Rule::method_definition;
    let mut children = ChildPairs::of(pair);
    let id = match children.peek_rule() {
        Some(Rule::identifier) => Some(build_identifier(&children.expect()?)),
        Some(Rule::property_name) if is_method => {
            let name_pair = children.expect()?;
            Some(IdentifierData {
                meta: get_meta(&name_pair),
                name: build_property_key(name_pair)?,
            })
        }
        _ => None,
    };
    let params = build_formal_parameters(children.expect()?)?;
    let body = build_function_body(children.expect()?)?;
    Ok(FunctionData {
        meta,
        id,
        params,
        body: FunctionBodyOrExpression::FunctionBody(body),
        is_arrow: false,
    })
}

fn build_ast_from_arrow_function(pair: Pair<Rule>) -> ParseResult<FunctionData> {
    let meta = get_meta(&pair);
    let mut children = ChildPairs::of(pair);
    let parameters_pair = children.expect()?;
    let mut parameter_children = ChildPairs::of(parameters_pair);
    let first = parameter_children.expect()?;
    let params = if first.as_rule() == Rule::identifier {
        vec![build_identifier(&first)]
    } else {
        build_formal_parameters(first)?
    };
    let body_pair = children.expect()?;
    let body = if body_pair.as_rule() == Rule::function_body {
        FunctionBodyOrExpression::FunctionBody(build_function_body(body_pair)?)
    } else {
        FunctionBodyOrExpression::Expression(Box::new(build_ast_from_expression(body_pair)?))
    };
    Ok(FunctionData {
        meta,
        id: None,
        params,
        body,
        is_arrow: true,
    })
}

fn build_formal_parameters(pair: Pair<Rule>) -> ParseResult<Vec<IdentifierData>> {
    if pair.as_rule() != Rule::formal_parameters {
        return Err(get_unexpected_error(3, &pair));
    }
    Ok(pair.into_inner().map(|p| build_identifier(&p)).collect())
}

fn build_function_body(pair: Pair<Rule>) -> ParseResult<FunctionBodyData> {
    if pair.as_rule() != Rule::function_body {
        return Err(get_unexpected_error(4, &pair));
    }
    let meta = get_meta(&pair);
    let mut children = ChildPairs::of(pair);
    let body = build_ast_from_statement_list(&mut children)?;
    let strict = has_use_strict_directive(&body);
    Ok(FunctionBodyData { meta, body, strict })
}

pub(crate) fn build_ast_from_expression(pair: Pair<Rule>) -> ParseResult<ExpressionType> {
    let meta = get_meta(&pair);
    Ok(match pair.as_rule() {
        Rule::expression => {
            let mut expressions = vec![];
            for inner_pair in pair.into_inner() {
                expressions.push(build_ast_from_expression(inner_pair)?);
            }
            if expressions.len() == 1 {
                expressions.remove(0)
            } else {
                ExpressionType::SequenceExpression { meta, expressions }
            }
        }
        Rule::assignment_expression => {
            let mut children = ChildPairs::of(pair);
            let first = children.expect()?;
            match children.next() {
                None => build_ast_from_expression(first)?,
                Some(right_pair) => {
                    let target_span = first.as_span();
                    let left = build_ast_from_expression(first)?;
                    if !left.is_valid_simple_assignment_target() {
                        return Err(get_custom_error(
                            "Invalid left-hand side in assignment",
                            target_span,
                        ));
                    }
                    ExpressionType::AssignmentExpression {
                        meta,
                        left: Box::new(left),
                        right: Box::new(build_ast_from_expression(right_pair)?),
                    }
                }
            }
        }
        Rule::arrow_function => {
            ExpressionType::ArrowFunctionExpression(Rc::new(build_ast_from_arrow_function(pair)?))
        }
        Rule::function_expression => {
            ExpressionType::FunctionExpression(Rc::new(build_ast_from_function(pair)?))
        }
        Rule::conditional_expression => {
            let mut children = ChildPairs::of(pair);
            let test = build_ast_from_expression(children.expect()?)?;
            match children.next() {
                None => test,
                Some(consequent_pair) => ExpressionType::ConditionalExpression {
                    meta,
                    test: Box::new(test),
                    consequent: Box::new(build_ast_from_expression(consequent_pair)?),
                    alternate: Box::new(build_ast_from_expression(children.expect()?)?),
                },
            }
        }
        Rule::logical_or_expression
        | Rule::logical_and_expression
        | Rule::equality_expression
        | Rule::relational_expression
        | Rule::additive_expression
        | Rule::multiplicative_expression => build_ast_from_binary_chain(pair)?,
        Rule::unary_expression => {
            let mut children = ChildPairs::of(pair);
            let first = children.expect()?;
            if first.as_rule() == Rule::unary_operator {
                let operator = match first.as_str() {
                    "!" => UnaryOperator::LogicalNot,
                    "-" => UnaryOperator::Minus,
                    "+" => UnaryOperator::Plus,
                    "typeof" => UnaryOperator::TypeOf,
                    "void" => UnaryOperator::Void,
                    _ => return Err(get_unexpected_error(5, &first)),
                };
                ExpressionType::UnaryExpression {
                    meta,
                    operator,
                    argument: Box::new(build_ast_from_expression(children.expect()?)?),
                }
            } else {
                build_ast_from_expression(first)?
            }
        }
        Rule::left_hand_side_expression | Rule::new_callee => build_ast_from_member_chain(pair)?,
        Rule::new_expression => {
            let mut children = ChildPairs::of(pair);
            let callee = build_ast_from_expression(children.expect()?)?;
            let arguments = match children.next() {
                Some(p) => build_ast_from_arguments(p)?,
                None => vec![],
            };
            ExpressionType::NewExpression {
                meta,
                callee: Box::new(callee),
                arguments,
            }
        }
        Rule::parenthesized_expression => {
            let mut children = ChildPairs::of(pair);
            build_ast_from_expression(children.expect()?)?
        }
        Rule::this_expression => ExpressionType::ThisExpression { meta },
        Rule::identifier => ExpressionType::Identifier(build_identifier(&pair)),
        Rule::null_literal => ExpressionType::Literal(LiteralData {
            meta,
            value: LiteralType::NullLiteral,
        }),
        Rule::boolean_literal => ExpressionType::Literal(LiteralData {
            meta,
            value: LiteralType::BooleanLiteral(pair.as_str() == "true"),
        }),
        Rule::numeric_literal => ExpressionType::Literal(LiteralData {
            meta,
            value: LiteralType::NumberLiteral(build_numeric_literal(&pair)?),
        }),
        Rule::string_literal => ExpressionType::Literal(LiteralData {
            meta,
            value: LiteralType::StringLiteral(build_string_literal(pair)),
        }),
        Rule::template_literal => ExpressionType::TemplateLiteral(build_template_literal(pair)?),
        Rule::array_literal => {
            let mut elements = vec![];
            for element in pair.into_inner() {
                elements.push(build_ast_from_expression(element)?);
            }
            ExpressionType::ArrayExpression { meta, elements }
        }
        Rule::object_literal => {
            let mut properties = vec![];
            for property in pair.into_inner() {
                properties.push(build_ast_from_property_definition(property)?);
            }
            ExpressionType::ObjectExpression { meta, properties }
        }
        _ => return Err(get_unexpected_error(6, &pair)),
    })
}

fn build_ast_from_binary_chain(pair: Pair<Rule>) -> ParseResult<ExpressionType> {
    let mut children = ChildPairs::of(pair);
    let first = children.expect()?;
    let start_index = first.as_span().start();
    let mut left = build_ast_from_expression(first)?;
    while let Some(operator_pair) = children.next() {
        let right_pair = children.expect()?;
        let meta = Meta {
            start_index,
            end_index: right_pair.as_span().end(),
        };
        let right = Box::new(build_ast_from_expression(right_pair)?);
        let left_box = Box::new(left);
        left = match operator_pair.as_rule() {
            Rule::or_operator => ExpressionType::LogicalExpression {
                meta,
                operator: LogicalOperator::Or,
                left: left_box,
                right,
            },
            Rule::and_operator => ExpressionType::LogicalExpression {
                meta,
                operator: LogicalOperator::And,
                left: left_box,
                right,
            },
            _ => ExpressionType::BinaryExpression {
                meta,
                operator: get_binary_operator(&operator_pair)?,
                left: left_box,
                right,
            },
        };
    }
    Ok(left)
}

fn get_binary_operator(pair: &Pair<Rule>) -> ParseResult<BinaryOperator> {
    Ok(match pair.as_str() {
        "==" => BinaryOperator::LooselyEqual,
        "!=" => BinaryOperator::LooselyUnequal,
        "===" => BinaryOperator::StrictlyEqual,
        "!==" => BinaryOperator::StrictlyUnequal,
        "<" => BinaryOperator::LessThan,
        "<=" => BinaryOperator::LessThanEqual,
        ">" => BinaryOperator::GreaterThan,
        ">=" => BinaryOperator::GreaterThanEqual,
        "+" => BinaryOperator::Add,
        "-" => BinaryOperator::Subtract,
        "*" => BinaryOperator::Multiply,
        "/" => BinaryOperator::Divide,
        "%" => BinaryOperator::Modulo,
        _ => return Err(get_unexpected_error(7, pair)),
    })
}

/// Folds `a.b[c](d)` style suffixes left to right onto the leading expression.
fn build_ast_from_member_chain(pair: Pair<Rule>) -> ParseResult<ExpressionType> {
    let mut children = ChildPairs::of(pair);
    let first = children.expect()?;
    let start_index = first.as_span().start();
    let mut expression = build_ast_from_expression(first)?;
    while let Some(suffix) = children.next() {
        let meta = Meta {
            start_index,
            end_index: suffix.as_span().end(),
        };
        expression = match suffix.as_rule() {
            Rule::arguments => ExpressionType::CallExpression {
                meta,
                callee: Box::new(expression),
                arguments: build_ast_from_arguments(suffix)?,
            },
            Rule::member_property => {
                let mut suffix_children = ChildPairs::of(suffix);
                let property = build_identifier(&suffix_children.expect()?);
                ExpressionType::MemberExpression(MemberExpressionType::SimpleMemberExpression {
                    meta,
                    object: Box::new(expression),
                    property,
                })
            }
            Rule::computed_property => {
                let mut suffix_children = ChildPairs::of(suffix);
                let property = build_ast_from_expression(suffix_children.expect()?)?;
                ExpressionType::MemberExpression(
                    MemberExpressionType::ComputedMemberExpression {
                        meta,
                        object: Box::new(expression),
                        property: Box::new(property),
                    },
                )
            }
            _ => return Err(get_unexpected_error(8, &suffix)),
        };
    }
    Ok(expression)
}

fn build_ast_from_arguments(pair: Pair<Rule>) -> ParseResult<Vec<ExpressionType>> {
    if pair.as_rule() != Rule::arguments {
        return Err(get_unexpected_error(9, &pair));
    }
    let mut arguments = vec![];
    for argument in pair.into_inner() {
        arguments.push(build_ast_from_expression(argument)?);
    }
    Ok(arguments)
}

fn build_ast_from_property_definition(pair: Pair<Rule>) -> ParseResult<PropertyData> {
    let meta = get_meta(&pair);
    let mut children = ChildPairs::of(pair);
    let first = children.expect()?;
    Ok(match first.as_rule() {
        Rule::method_definition => {
            let function = build_ast_from_function(first)?;
            let key = function
                .id
                .as_ref()
                .map(|id| id.name.clone())
                .unwrap_or_default();
            PropertyData {
                meta,
                key,
                value: ExpressionType::FunctionExpression(Rc::new(function)),
                method: true,
                shorthand: false,
            }
        }
        Rule::property_name => {
            let key = build_property_key(first)?;
            PropertyData {
                meta,
                key,
                value: build_ast_from_expression(children.expect()?)?,
                method: false,
                shorthand: false,
            }
        }
        Rule::identifier => {
            let id = build_identifier(&first);
            PropertyData {
                meta,
                key: id.name.clone(),
                value: ExpressionType::Identifier(id),
                method: false,
                shorthand: true,
            }
        }
        _ => return Err(get_unexpected_error(10, &first)),
    })
}

fn build_property_key(pair: Pair<Rule>) -> ParseResult<String> {
    let mut children = ChildPairs::of(pair);
    let key_pair = children.expect()?;
    Ok(match key_pair.as_rule() {
        Rule::identifier_name => key_pair.as_str().to_string(),
        Rule::string_literal => build_string_literal(key_pair),
        Rule::numeric_literal => match build_numeric_literal(&key_pair)? {
            NumberLiteralType::IntegerLiteral(i) => i.to_string(),
            NumberLiteralType::FloatLiteral(f) => f.to_string(),
        },
        _ => return Err(get_unexpected_error(11, &key_pair)),
    })
}

fn build_numeric_literal(pair: &Pair<Rule>) -> ParseResult<NumberLiteralType> {
    let text = pair.as_str();
    if !text.contains(['.', 'e', 'E']) {
        if let Ok(i) = text.parse::<i64>() {
            return Ok(NumberLiteralType::IntegerLiteral(i));
        }
    }
    match text.parse::<f64>() {
        Ok(f) => Ok(NumberLiteralType::FloatLiteral(f)),
        Err(_) => Err(get_custom_error("Invalid numeric literal", pair.as_span())),
    }
}

fn build_string_literal(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|characters| unescape(characters.as_str()))
        .unwrap_or_default()
}

fn build_template_literal(pair: Pair<Rule>) -> ParseResult<TemplateLiteralData> {
    let meta = get_meta(&pair);
    let mut quasis = vec![];
    let mut expressions = vec![];
    let mut current = String::new();
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::template_characters => current.push_str(&unescape(part.as_str())),
            Rule::template_substitution => {
                quasis.push(std::mem::take(&mut current));
                let mut children = ChildPairs::of(part);
                expressions.push(build_ast_from_expression(children.expect()?)?);
            }
            _ => return Err(get_unexpected_error(12, &part)),
        }
    }
    quasis.push(current);
    Ok(TemplateLiteralData {
        meta,
        quasis,
        expressions,
    })
}

fn unescape(raw: &str) -> String {
    let mut cooked = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            cooked.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => cooked.push('\n'),
            Some('t') => cooked.push('\t'),
            Some('r') => cooked.push('\r'),
            Some('b') => cooked.push('\u{8}'),
            Some('f') => cooked.push('\u{c}'),
            Some('v') => cooked.push('\u{b}'),
            Some('0') => cooked.push('\0'),
            Some(other) => cooked.push(other),
            None => {}
        }
    }
    cooked
}
