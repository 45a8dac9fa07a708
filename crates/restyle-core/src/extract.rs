//! Style-table extraction: find `const styles = StyleSheet.create({...})`,
//! turn it into stylesheet text and remove it from the source.

use tree_sitter::Node;
use tracing::debug;

use crate::ast::{Declaration, Member, StyleGroup, StyleTable, Value};
use crate::comments::attached;
use crate::config::Config;
use crate::context::ContextEvaluator;
use crate::emitter::emit_css;
use crate::error::Result;
use crate::source::{named_children, statement_extent, string_value, Document, Edits};
use crate::units::parse_number;

#[derive(Debug)]
pub struct Extraction {
    pub source: String,
    pub table: Option<ExtractedTable>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTable {
    pub name: String,
    pub exported: bool,
    pub css: String,
}

/// Convert the first style table of `doc` to CSS and remove its declaration.
/// Later tables in the same file are left in place.
pub fn extract_style_table(doc: &Document, config: &Config, context: &ContextEvaluator) -> Result<Extraction> {
    for statement in named_children(doc.root()) {
        let (declaration, exported) = match statement.kind() {
            "lexical_declaration" | "variable_declaration" => (statement, false),
            "export_statement" => match statement.child_by_field_name("declaration") {
                Some(decl) if matches!(decl.kind(), "lexical_declaration" | "variable_declaration") => (decl, true),
                _ => continue,
            },
            _ => continue,
        };

        let Some((declarator, object)) = match_style_table(doc, declaration, config) else {
            continue;
        };

        let table = parse_table(doc, statement, declarator, object, exported, context)?;
        debug!(
            name = %table.name,
            exported = table.exported,
            groups = table.groups.len(),
            "extracted style table"
        );

        let mut edits = Edits::new();
        let extent = table.comments.extent(statement);
        edits.delete(statement_extent(doc.text(), extent));

        return Ok(Extraction {
            source: edits.apply(doc.text()),
            table: Some(ExtractedTable {
                css: emit_css(&table),
                name: table.name,
                exported: table.exported,
            }),
        });
    }

    Ok(Extraction {
        source: doc.text().to_string(),
        table: None,
    })
}

/// `(declarator, object argument)` when `declaration` has the shape
/// `const <name> = <Factory>.<method>({...})` with a single declarator.
fn match_style_table<'t>(doc: &Document, declaration: Node<'t>, config: &Config) -> Option<(Node<'t>, Node<'t>)> {
    let declarators: Vec<Node<'t>> = named_children(declaration)
        .into_iter()
        .filter(|child| child.kind() == "variable_declarator")
        .collect();
    let [declarator] = declarators.as_slice() else {
        return None;
    };

    let call = declarator.child_by_field_name("value")?;
    if call.kind() != "call_expression" {
        return None;
    }
    let callee = call.child_by_field_name("function")?;
    if callee.kind() != "member_expression" {
        return None;
    }
    let object = callee.child_by_field_name("object")?;
    let property = callee.child_by_field_name("property")?;
    if object.kind() != "identifier"
        || doc.slice(object) != config.factory_object
        || property.kind() != "property_identifier"
        || doc.slice(property) != config.factory_method
    {
        return None;
    }

    let arguments = call.child_by_field_name("arguments")?;
    if arguments.kind() != "arguments" {
        return None;
    }
    match named_children(arguments).as_slice() {
        [argument] if argument.kind() == "object" => Some((*declarator, *argument)),
        _ => None,
    }
}

fn parse_table(
    doc: &Document,
    statement: Node<'_>,
    declarator: Node<'_>,
    object: Node<'_>,
    exported: bool,
    context: &ContextEvaluator,
) -> Result<StyleTable> {
    let name = declarator
        .child_by_field_name("name")
        .ok_or_else(|| doc.unhandled("variable declarator without a name", declarator))?;
    if name.kind() != "identifier" {
        return Err(doc.unhandled(format!("variableDeclarator id type \"{}\" not handled", name.kind()), name));
    }

    let groups = named_children(object)
        .into_iter()
        .map(|member| {
            if member.kind() != "pair" {
                return Err(doc.unhandled(format!("style table member of type \"{}\" not handled", member.kind()), member));
            }
            parse_group(doc, member, context)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StyleTable {
        name: doc.slice(name).to_string(),
        exported,
        groups,
        comments: attached(doc, statement)?,
    })
}

fn parse_group(doc: &Document, pair: Node<'_>, context: &ContextEvaluator) -> Result<StyleGroup> {
    let key = field(doc, pair, "key")?;
    let name = match key.kind() {
        "property_identifier" => doc.slice(key).to_string(),
        "string" => string_value(doc.text(), key),
        other => return Err(doc.unhandled(format!("ruleSetProperty key type \"{other}\" not handled"), pair)),
    };

    let value = field(doc, pair, "value")?;
    if value.kind() != "object" {
        return Err(doc.unhandled(
            format!("ruleSetProperty value type \"{}\" not handled", value.kind()),
            pair,
        ));
    }

    let mut members = Vec::new();
    for member in named_children(value) {
        if member.kind() != "pair" {
            return Err(doc.unhandled(format!("property of type \"{}\" not handled", member.kind()), member));
        }
        let member_key = field(doc, member, "key")?;
        let is_nested = member_key.kind() == "string" && string_value(doc.text(), member_key).starts_with(':');
        if is_nested {
            members.push(Member::Nested(parse_group(doc, member, context)?));
        } else {
            members.push(Member::Declaration(parse_declaration(doc, member, context)?));
        }
    }

    Ok(StyleGroup {
        name,
        members,
        comments: attached(doc, pair)?,
    })
}

fn parse_declaration(doc: &Document, pair: Node<'_>, context: &ContextEvaluator) -> Result<Declaration> {
    let key = field(doc, pair, "key")?;
    let property = match key.kind() {
        "property_identifier" => doc.slice(key).to_string(),
        "string" => return Err(doc.unhandled("string property without ':' prefix not handled", pair)),
        other => {
            return Err(doc.unhandled(format!("cssDeclarationProperty key type \"{other}\" not handled"), pair))
        }
    };

    let value = field(doc, pair, "value")?;
    let value = match value.kind() {
        "number" => Value::Number(number(doc, value)?),
        "string" => Value::Text(string_value(doc.text(), value)),
        "unary_expression" => {
            let operator = field(doc, value, "operator")?.kind();
            let argument = field(doc, value, "argument")?;
            if argument.kind() != "number" {
                return Err(doc.unhandled(
                    format!("argument type \"{}\" in UnaryExpression not handled", argument.kind()),
                    pair,
                ));
            }
            let operator = match operator {
                "-" => '-',
                "+" => '+',
                other => return Err(doc.unhandled(format!("unary operator \"{other}\" not handled"), pair)),
            };
            Value::Signed {
                operator,
                magnitude: number(doc, argument)?,
            }
        }
        "identifier" | "member_expression" | "subscript_expression" | "call_expression" | "template_string"
        | "binary_expression" => Value::Resolved(context.evaluate(doc, value)?),
        other => {
            return Err(doc.unhandled(format!("cssDeclarationProperty value type \"{other}\" not handled"), pair))
        }
    };

    Ok(Declaration {
        property,
        value,
        comments: attached(doc, pair)?,
    })
}

fn field<'t>(doc: &Document, node: Node<'t>, name: &str) -> Result<Node<'t>> {
    node.child_by_field_name(name)
        .ok_or_else(|| doc.unhandled(format!("{} without a {name}", node.kind()), node))
}

fn number(doc: &Document, node: Node<'_>) -> Result<f64> {
    parse_number(doc.slice(node)).ok_or_else(|| doc.unhandled("numeric literal not handled", node))
}
