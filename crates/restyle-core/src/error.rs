use std::fmt;
use std::io;
use std::path::PathBuf;

use tree_sitter::Node;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub const fn dummy() -> Self {
        Self { line: 0, column: 0 }
    }

    /// One-based position of the first byte of `node`.
    pub fn of(node: Node<'_>) -> Self {
        let point = node.start_position();
        Self {
            line: point.row + 1,
            column: point.column + 1,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 && self.column == 0 {
            write!(f, "<unknown>")
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Failure of a single file's migration.
///
/// `Display` renders the short message that goes into the error log; the
/// offending source text is available through [`MigrateError::snippet`].
#[derive(thiserror::Error, Debug)]
pub enum MigrateError {
    /// A node shape the rewriter has no rule for.
    #[error("{message}")]
    UnhandledShape {
        message: String,
        snippet: String,
        span: Span,
    },

    /// Duplicate module imports or a conflicting default import.
    #[error("{message}")]
    AmbiguousStructure { message: String, snippet: String },

    #[error("Import aliases are not supported ({imported} -> {local})")]
    UnsupportedFeature { imported: String, local: String },

    /// A dynamic style value could not be resolved against the context source.
    #[error("{reason} - Update \"{context}\" to fix.")]
    UnresolvedExpression {
        reason: String,
        context: String,
        snippet: String,
        span: Span,
    },

    #[error("{message} at {span}")]
    Syntax { message: String, span: Span },

    #[error("invalid configuration {path}: {message}")]
    Config { path: String, message: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MigrateError {
    pub fn unhandled(message: impl Into<String>, node: Node<'_>, source: &str) -> Self {
        Self::UnhandledShape {
            message: message.into(),
            snippet: source[node.byte_range()].to_string(),
            span: Span::of(node),
        }
    }

    pub fn ambiguous(message: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self::AmbiguousStructure {
            message: message.into(),
            snippet: snippet.into(),
        }
    }

    pub fn snippet(&self) -> Option<&str> {
        match self {
            Self::UnhandledShape { snippet, .. }
            | Self::AmbiguousStructure { snippet, .. }
            | Self::UnresolvedExpression { snippet, .. } => Some(snippet),
            _ => None,
        }
    }

    /// The message followed by the offending source, for terminal output.
    pub fn report(&self) -> String {
        match self.snippet() {
            Some(snippet) => format!("{self}\n\n{snippet}\n"),
            None => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_span_displays_unknown() {
        assert_eq!(Span::dummy().to_string(), "<unknown>");
        assert_eq!(Span { line: 3, column: 7 }.to_string(), "3:7");
    }

    #[test]
    fn unresolved_expression_names_context_file() {
        let err = MigrateError::UnresolvedExpression {
            reason: "ReferenceError: spacing is not defined".into(),
            context: "./context.example.js".into(),
            snippet: "spacing.small".into(),
            span: Span { line: 4, column: 12 },
        };
        assert_eq!(
            err.to_string(),
            "ReferenceError: spacing is not defined - Update \"./context.example.js\" to fix."
        );
        assert!(err.report().ends_with("\n\nspacing.small\n"));
    }
}
