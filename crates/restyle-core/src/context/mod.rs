//! Transform-time resolution of dynamic style values.
//!
//! Values such as `colors.primary` or `hexToRgbA(colors.danger, 0.8)` are
//! evaluated against the bindings of an external context source, never
//! against the file being migrated, so the emitted stylesheet is static.

mod expr;
mod scope;
mod value;

use std::path::PathBuf;

use once_cell::sync::OnceCell;
use tree_sitter::Node;

use crate::error::{MigrateError, Result, Span};
use crate::source::Document;

pub use expr::{Expr, Function};
pub use scope::Scope;
pub use value::Value;

#[derive(thiserror::Error, Debug)]
pub enum EvalError {
    #[error("{0}")]
    Load(String),

    #[error("ReferenceError: {0} is not defined")]
    NotDefined(String),

    #[error("TypeError: Cannot read properties of {base} (reading '{property}')")]
    ReadOfNullish { base: String, property: String },

    #[error("TypeError: {0} is not a function")]
    NotCallable(String),

    #[error("unsupported expression `{0}`")]
    Unsupported(String),

    #[error("invalid regular expression /{pattern}/: {message}")]
    Regex { pattern: String, message: String },

    #[error("expression evaluated to 'undefined'")]
    Undefined,
}

/// Lazily loaded context scope. The source is read on the first dynamic
/// value, so files without dynamic values never need it to exist.
#[derive(Debug)]
pub struct ContextEvaluator {
    path: PathBuf,
    scope: OnceCell<Scope>,
}

impl ContextEvaluator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            scope: OnceCell::new(),
        }
    }

    /// Evaluator over an already built scope.
    pub fn with_scope(path: impl Into<PathBuf>, scope: Scope) -> Self {
        Self {
            path: path.into(),
            scope: OnceCell::with_value(scope),
        }
    }

    fn scope(&self) -> std::result::Result<&Scope, EvalError> {
        self.scope.get_or_try_init(|| {
            let scope = Scope::load(&self.path)?;
            if scope.is_empty() {
                tracing::warn!(path = %self.path.display(), "context source defines no bindings");
            } else {
                tracing::debug!(path = %self.path.display(), bindings = scope.len(), "loaded context scope");
            }
            Ok(scope)
        })
    }

    /// Evaluate the expression at `node` and render it as a CSS value.
    pub fn evaluate(&self, doc: &Document, node: Node<'_>) -> Result<String> {
        self.try_evaluate(doc, node).map_err(|err| MigrateError::UnresolvedExpression {
            reason: err.to_string(),
            context: self.path.display().to_string(),
            snippet: doc.slice(node).to_string(),
            span: Span::of(node),
        })
    }

    fn try_evaluate(&self, doc: &Document, node: Node<'_>) -> std::result::Result<String, EvalError> {
        let expr = expr::lower(node, doc.text())?;
        let scope = self.scope()?;
        match scope.eval(&expr)? {
            Value::Undefined => Err(EvalError::Undefined),
            value => Ok(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{named_children, Dialect};

    fn value_node(doc: &Document) -> Node<'_> {
        let statement = named_children(doc.root())[0];
        named_children(statement)[0]
    }

    #[test]
    fn missing_context_file_is_reported_with_its_path() {
        let evaluator = ContextEvaluator::new("./does-not-exist/context.js");
        let doc = Document::parse("colors.info;", Dialect::JavaScript).unwrap();
        let err = evaluator.evaluate(&doc, value_node(&doc)).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Could not read ./does-not-exist/context.js"));
        assert!(message.ends_with("- Update \"./does-not-exist/context.js\" to fix."));
    }

    #[test]
    fn undefined_results_are_errors() {
        let scope = Scope::from_source("const colors = { info: 'blue' };", Dialect::JavaScript).unwrap();
        let evaluator = ContextEvaluator::with_scope("ctx.js", scope);
        let doc = Document::parse("colors.warning;", Dialect::JavaScript).unwrap();
        let err = evaluator.evaluate(&doc, value_node(&doc)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "expression evaluated to 'undefined' - Update \"ctx.js\" to fix."
        );

        let doc = Document::parse("colors.info;", Dialect::JavaScript).unwrap();
        assert_eq!(evaluator.evaluate(&doc, value_node(&doc)).unwrap(), "blue");
    }

    #[test]
    fn empty_context_still_evaluates_literals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.js");
        std::fs::write(&path, "// nothing here\n").unwrap();
        assert!(Scope::load(&path).unwrap().is_empty());

        let evaluator = ContextEvaluator::new(&path);
        let doc = Document::parse("`${2 * 3}px`;", Dialect::JavaScript).unwrap();
        assert_eq!(evaluator.evaluate(&doc, value_node(&doc)).unwrap(), "6px");
    }

    #[test]
    fn loads_from_disk_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.json");
        std::fs::write(&path, r#"{ "radius": 4 }"#).unwrap();
        let evaluator = ContextEvaluator::new(&path);
        let doc = Document::parse("`${radius * 2}px`;", Dialect::JavaScript).unwrap();
        assert_eq!(evaluator.evaluate(&doc, value_node(&doc)).unwrap(), "8px");

        std::fs::remove_file(&path).unwrap();
        assert_eq!(evaluator.evaluate(&doc, value_node(&doc)).unwrap(), "8px");
    }
}
