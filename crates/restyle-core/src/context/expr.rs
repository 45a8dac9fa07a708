//! Owned expression tree for the context interpreter, lowered from
//! tree-sitter nodes.

use std::sync::Arc;

use tree_sitter::Node;

use super::EvalError;
use crate::source::{named_children, string_value, unescape};
use crate::units::parse_number;

#[derive(Debug, Clone)]
pub enum Expr {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    /// `quasis` has one more entry than `exprs`.
    Template { quasis: Vec<String>, exprs: Vec<Expr> },
    Regex { pattern: String, flags: String },
    Ident(String),
    /// `a.b` lowers with `property` as a string literal, `a[b]` with the
    /// index expression.
    Member { object: Box<Expr>, property: Box<Expr> },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Unary { operator: &'static str, argument: Box<Expr> },
    Binary { operator: &'static str, left: Box<Expr>, right: Box<Expr> },
    Conditional { test: Box<Expr>, consequent: Box<Expr>, alternate: Box<Expr> },
    Array(Vec<Expr>),
    Object(Vec<(String, Expr)>),
    Function(Arc<Function>),
}

/// A function restricted to local bindings followed by one `return`.
#[derive(Debug)]
pub struct Function {
    pub params: Vec<String>,
    pub locals: Vec<(String, Expr)>,
    pub body: Expr,
}

fn field<'t>(node: Node<'t>, name: &str, src: &str) -> Result<Node<'t>, EvalError> {
    node.child_by_field_name(name)
        .ok_or_else(|| EvalError::Unsupported(src[node.byte_range()].to_string()))
}

fn unsupported(node: Node<'_>, src: &str) -> EvalError {
    EvalError::Unsupported(src[node.byte_range()].to_string())
}

pub fn lower(node: Node<'_>, src: &str) -> Result<Expr, EvalError> {
    let text = &src[node.byte_range()];
    let expr = match node.kind() {
        "number" => Expr::Number(parse_number(text).ok_or_else(|| unsupported(node, src))?),
        "string" => Expr::Str(string_value(src, node)),
        "true" => Expr::Bool(true),
        "false" => Expr::Bool(false),
        "null" => Expr::Null,
        "undefined" => Expr::Undefined,
        "identifier" if text == "undefined" => Expr::Undefined,
        "identifier" => Expr::Ident(text.to_string()),
        "template_string" => lower_template(node, src)?,
        "regex" => Expr::Regex {
            pattern: src[field(node, "pattern", src)?.byte_range()].to_string(),
            flags: node
                .child_by_field_name("flags")
                .map(|flags| src[flags.byte_range()].to_string())
                .unwrap_or_default(),
        },
        "member_expression" => {
            let object = lower(field(node, "object", src)?, src)?;
            let property = field(node, "property", src)?;
            Expr::Member {
                object: Box::new(object),
                property: Box::new(Expr::Str(src[property.byte_range()].to_string())),
            }
        }
        "subscript_expression" => Expr::Member {
            object: Box::new(lower(field(node, "object", src)?, src)?),
            property: Box::new(lower(field(node, "index", src)?, src)?),
        },
        "call_expression" => {
            let arguments = field(node, "arguments", src)?;
            if arguments.kind() != "arguments" {
                return Err(unsupported(node, src));
            }
            let args = named_children(arguments)
                .into_iter()
                .map(|arg| lower(arg, src))
                .collect::<Result<Vec<_>, _>>()?;
            Expr::Call {
                callee: Box::new(lower(field(node, "function", src)?, src)?),
                args,
            }
        }
        "unary_expression" => Expr::Unary {
            operator: field(node, "operator", src)?.kind(),
            argument: Box::new(lower(field(node, "argument", src)?, src)?),
        },
        "binary_expression" => Expr::Binary {
            operator: field(node, "operator", src)?.kind(),
            left: Box::new(lower(field(node, "left", src)?, src)?),
            right: Box::new(lower(field(node, "right", src)?, src)?),
        },
        "ternary_expression" => Expr::Conditional {
            test: Box::new(lower(field(node, "condition", src)?, src)?),
            consequent: Box::new(lower(field(node, "consequence", src)?, src)?),
            alternate: Box::new(lower(field(node, "alternative", src)?, src)?),
        },
        "parenthesized_expression" | "as_expression" | "satisfies_expression"
        | "non_null_expression" => match named_children(node).first() {
            Some(inner) => lower(*inner, src)?,
            None => return Err(unsupported(node, src)),
        },
        "array" => Expr::Array(
            named_children(node)
                .into_iter()
                .map(|item| lower(item, src))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        "object" => lower_object(node, src)?,
        "arrow_function" => {
            let params = match node.child_by_field_name("parameter") {
                Some(param) => vec![src[param.byte_range()].to_string()],
                None => lower_params(field(node, "parameters", src)?, src)?,
            };
            let body = field(node, "body", src)?;
            let function = if body.kind() == "statement_block" {
                lower_function_body(params, body, src)?
            } else {
                Function {
                    params,
                    locals: Vec::new(),
                    body: lower(body, src)?,
                }
            };
            Expr::Function(Arc::new(function))
        }
        "function_expression" | "function" => Expr::Function(Arc::new(lower_function(node, src)?)),
        _ => return Err(unsupported(node, src)),
    };
    Ok(expr)
}

fn lower_template(node: Node<'_>, src: &str) -> Result<Expr, EvalError> {
    let mut quasis = Vec::new();
    let mut exprs = Vec::new();
    let mut pos = node.start_byte() + 1;
    for part in named_children(node) {
        if part.kind() != "template_substitution" {
            continue;
        }
        quasis.push(unescape(&src[pos..part.start_byte()]));
        let inner = named_children(part)
            .into_iter()
            .next()
            .ok_or_else(|| unsupported(part, src))?;
        exprs.push(lower(inner, src)?);
        pos = part.end_byte();
    }
    let end = node.end_byte().saturating_sub(1).max(pos);
    quasis.push(unescape(&src[pos..end]));
    Ok(Expr::Template { quasis, exprs })
}

fn lower_object(node: Node<'_>, src: &str) -> Result<Expr, EvalError> {
    let mut entries = Vec::new();
    for member in named_children(node) {
        match member.kind() {
            "pair" => {
                let key = field(member, "key", src)?;
                let name = match key.kind() {
                    "property_identifier" | "number" => src[key.byte_range()].to_string(),
                    "string" => string_value(src, key),
                    _ => return Err(unsupported(key, src)),
                };
                entries.push((name, lower(field(member, "value", src)?, src)?));
            }
            "shorthand_property_identifier" => {
                let name = src[member.byte_range()].to_string();
                entries.push((name.clone(), Expr::Ident(name)));
            }
            _ => return Err(unsupported(member, src)),
        }
    }
    Ok(Expr::Object(entries))
}

pub fn lower_function(node: Node<'_>, src: &str) -> Result<Function, EvalError> {
    let params = lower_params(field(node, "parameters", src)?, src)?;
    lower_function_body(params, field(node, "body", src)?, src)
}

fn lower_params(node: Node<'_>, src: &str) -> Result<Vec<String>, EvalError> {
    named_children(node)
        .into_iter()
        .map(|param| {
            let ident = match param.kind() {
                "identifier" => param,
                "required_parameter" | "optional_parameter" => field(param, "pattern", src)?,
                _ => return Err(unsupported(param, src)),
            };
            if ident.kind() != "identifier" {
                return Err(unsupported(ident, src));
            }
            Ok(src[ident.byte_range()].to_string())
        })
        .collect()
}

fn lower_function_body(params: Vec<String>, block: Node<'_>, src: &str) -> Result<Function, EvalError> {
    let mut locals = Vec::new();
    for statement in named_children(block) {
        match statement.kind() {
            "lexical_declaration" | "variable_declaration" => {
                locals.extend(lower_declarators(statement, src)?);
            }
            "return_statement" => {
                let body = match named_children(statement).first() {
                    Some(expr) => lower(*expr, src)?,
                    None => Expr::Undefined,
                };
                return Ok(Function { params, locals, body });
            }
            "empty_statement" => {}
            _ => return Err(unsupported(statement, src)),
        }
    }
    Ok(Function {
        params,
        locals,
        body: Expr::Undefined,
    })
}

/// `(name, initializer)` for every declarator of a `const`/`let`/`var`.
pub fn lower_declarators(node: Node<'_>, src: &str) -> Result<Vec<(String, Expr)>, EvalError> {
    named_children(node)
        .into_iter()
        .filter(|child| child.kind() == "variable_declarator")
        .map(|declarator| {
            let name = field(declarator, "name", src)?;
            if name.kind() != "identifier" {
                return Err(unsupported(name, src));
            }
            let value = match declarator.child_by_field_name("value") {
                Some(value) => lower(value, src)?,
                None => Expr::Undefined,
            };
            Ok((src[name.byte_range()].to_string(), value))
        })
        .collect()
}
