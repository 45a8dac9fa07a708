//! Import and export edits.
//!
//! A module may be imported by at most one declaration; a second one leaves
//! no single place to merge into and is rejected. Aliased named imports of
//! the specifiers being looked up are rejected as well.

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

use crate::error::{MigrateError, Result};
use crate::source::{named_children, statement_extent, string_value, Document, Edits};

static BLANK_LINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").expect("valid regex"));

/// Top-level import declarations of `module`.
fn module_imports<'t>(doc: &'t Document, module: &str) -> Vec<Node<'t>> {
    named_children(doc.root())
        .into_iter()
        .filter(|statement| statement.kind() == "import_statement")
        .filter(|statement| {
            statement
                .child_by_field_name("source")
                .is_some_and(|source| string_value(doc.text(), source) == module)
        })
        .collect()
}

fn single_module_import<'t>(doc: &'t Document, module: &str) -> Result<Option<Node<'t>>> {
    let imports = module_imports(doc, module);
    match imports.as_slice() {
        [] => Ok(None),
        [import] => Ok(Some(*import)),
        _ => {
            let snippet: Vec<&str> = imports.iter().map(|import| doc.slice(*import)).collect();
            Err(MigrateError::ambiguous(
                "multiple imports of 1 module not supported",
                snippet.join("\n"),
            ))
        }
    }
}

/// The clause of an import declaration, split into its parts.
struct ImportClause<'t> {
    default: Option<Node<'t>>,
    namespace: Option<Node<'t>>,
    named: Vec<Node<'t>>,
}

impl<'t> ImportClause<'t> {
    fn of(statement: Node<'t>) -> Option<Self> {
        let clause = named_children(statement)
            .into_iter()
            .find(|child| child.kind() == "import_clause")?;

        let mut parts = Self {
            default: None,
            namespace: None,
            named: Vec::new(),
        };
        for child in named_children(clause) {
            match child.kind() {
                "identifier" => parts.default = Some(child),
                "namespace_import" => parts.namespace = Some(child),
                "named_imports" => parts.named = named_children(child),
                _ => {}
            }
        }
        Some(parts)
    }
}

/// Whether `specifier` imports one of `names`.
fn is_named_import_match(doc: &Document, specifier: Node<'_>, names: &[&str]) -> Result<bool> {
    if specifier.kind() != "import_specifier" {
        return Ok(false);
    }
    let Some(name) = specifier.child_by_field_name("name") else {
        return Ok(false);
    };
    let imported = doc.slice(name);
    if !names.contains(&imported) {
        return Ok(false);
    }
    if let Some(alias) = specifier.child_by_field_name("alias") {
        let local = doc.slice(alias);
        if local != imported {
            return Err(MigrateError::UnsupportedFeature {
                imported: imported.to_string(),
                local: local.to_string(),
            });
        }
    }
    Ok(true)
}

/// Import `local` as the default export of `module`, merging into an
/// existing declaration of that module when there is one.
pub fn add_default_import(doc: &Document, module: &str, local: &str) -> Result<String> {
    let mut edits = Edits::new();

    match single_module_import(doc, module)? {
        None => {
            let declaration = format!("import {local} from \"{module}\";");
            match prologue_end(doc) {
                Some(end) => edits.insert(end, format!("\n{declaration}")),
                None => edits.insert(0, format!("{declaration}\n")),
            }
        }
        Some(statement) => match ImportClause::of(statement) {
            Some(ImportClause {
                default: Some(existing),
                ..
            }) => {
                if doc.slice(existing) != local {
                    return Err(MigrateError::ambiguous(
                        format!("Default import to add (`{local}`) does not match existing default import:"),
                        doc.slice(statement),
                    ));
                }
            }
            Some(_) => {
                let clause = named_children(statement)
                    .into_iter()
                    .find(|child| child.kind() == "import_clause")
                    .ok_or_else(|| doc.unhandled("import without a clause", statement))?;
                edits.insert(clause.start_byte(), format!("{local}, "));
            }
            None => {
                let source = statement
                    .child_by_field_name("source")
                    .ok_or_else(|| doc.unhandled("import without a source", statement))?;
                edits.insert(source.start_byte(), format!("{local} from "));
            }
        },
    }

    Ok(edits.apply(doc.text()))
}

/// End of a leading hashbang line and directives such as `"use client";`.
fn prologue_end(doc: &Document) -> Option<usize> {
    let mut end = None;
    for statement in named_children(doc.root()) {
        let is_prologue = match statement.kind() {
            "hash_bang_line" => true,
            "expression_statement" => {
                matches!(named_children(statement).as_slice(), [expr] if expr.kind() == "string")
            }
            _ => false,
        };
        if !is_prologue {
            break;
        }
        end = Some(statement.end_byte());
    }
    end
}

/// True when the single import declaration of `module` has a non-aliased
/// named specifier for one of `names`.
pub fn has_named_imports(doc: &Document, module: &str, names: &[&str]) -> Result<bool> {
    let Some(statement) = single_module_import(doc, module)? else {
        return Ok(false);
    };
    let Some(clause) = ImportClause::of(statement) else {
        return Ok(false);
    };

    let mut found = false;
    for specifier in clause.named {
        found |= is_named_import_match(doc, specifier, names)?;
    }
    Ok(found)
}

/// Drop the named specifiers `names` from every import of `module`. A
/// declaration left without specifiers is removed entirely.
pub fn remove_named_imports(doc: &Document, module: &str, names: &[&str]) -> Result<String> {
    let mut edits = Edits::new();

    for statement in module_imports(doc, module) {
        let Some(clause) = ImportClause::of(statement) else {
            continue;
        };

        let mut kept = Vec::new();
        let mut removed = 0;
        for specifier in &clause.named {
            if is_named_import_match(doc, *specifier, names)? {
                removed += 1;
            } else {
                kept.push(doc.slice(*specifier));
            }
        }
        if removed == 0 {
            continue;
        }

        if clause.default.is_none() && clause.namespace.is_none() && kept.is_empty() {
            edits.delete(statement_extent(doc.text(), statement.byte_range()));
            continue;
        }

        let source = statement
            .child_by_field_name("source")
            .ok_or_else(|| doc.unhandled("import without a source", statement))?;

        let mut parts = Vec::new();
        if let Some(default) = clause.default {
            parts.push(doc.slice(default).to_string());
        }
        if let Some(namespace) = clause.namespace {
            parts.push(doc.slice(namespace).to_string());
        }
        if !kept.is_empty() {
            parts.push(format!("{{ {} }}", kept.join(", ")));
        }
        edits.replace(
            statement.byte_range(),
            format!("import {} from {};", parts.join(", "), doc.slice(source)),
        );
    }

    Ok(edits.apply(doc.text()))
}

/// Append `export { a, b };` after a blank line at the end of `source`, then
/// collapse runs of blank lines to one.
pub fn add_named_exports(source: &str, names: &[&str]) -> String {
    let text = format!("{}\n\nexport {{ {} }};\n", source.trim_end(), names.join(", "));
    BLANK_LINE_RUNS.replace_all(&text, "\n\n").into_owned()
}
