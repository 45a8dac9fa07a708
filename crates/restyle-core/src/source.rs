//! Parsed source files and byte-range editing.
//!
//! A [`Document`] owns its text and the tree-sitter tree built from it. The
//! tree is never mutated: passes collect [`Edits`] against the text, apply
//! them to produce new text and reparse.

use std::ops::Range;
use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::{MigrateError, Result, Span};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    TypeScript,
    Tsx,
    JavaScript,
}

impl Dialect {
    /// Pick a grammar from the file extension. Unknown extensions parse as
    /// JavaScript, which accepts JSX.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "ts" | "mts" | "cts" => Self::TypeScript,
            "tsx" => Self::Tsx,
            _ => Self::JavaScript,
        }
    }

    fn language(self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

pub struct Document {
    text: String,
    tree: Tree,
    dialect: Dialect,
}

impl Document {
    pub fn parse(text: impl Into<String>, dialect: Dialect) -> Result<Self> {
        let text = text.into();
        let mut parser = Parser::new();
        parser
            .set_language(&dialect.language())
            .map_err(|e| MigrateError::Syntax {
                message: format!("incompatible grammar: {e}"),
                span: Span::dummy(),
            })?;
        let tree = parser.parse(&text, None).ok_or_else(|| MigrateError::Syntax {
            message: "parser produced no tree".to_string(),
            span: Span::dummy(),
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let span = first_error(root).map_or(Span::dummy(), Span::of);
            return Err(MigrateError::Syntax {
                message: "syntax error".to_string(),
                span,
            });
        }

        Ok(Self {
            text,
            tree,
            dialect,
        })
    }

    /// Parse `text` with the same grammar as this document.
    pub fn reparse(&self, text: impl Into<String>) -> Result<Self> {
        Self::parse(text, self.dialect)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn slice(&self, node: Node<'_>) -> &str {
        &self.text[node.byte_range()]
    }

    pub fn unhandled(&self, message: impl Into<String>, node: Node<'_>) -> MigrateError {
        MigrateError::unhandled(message, node, &self.text)
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

/// Named children other than comments.
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    children
}

/// Visit `node` and all of its descendants in document order.
pub fn walk<'t>(node: Node<'t>, visit: &mut impl FnMut(Node<'t>)) {
    visit(node);
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    for child in children {
        walk(child, visit);
    }
}

pub fn has_ancestor(node: Node<'_>, kind: &str) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.kind() == kind {
            return true;
        }
        current = parent.parent();
    }
    false
}

/// Decoded value of a `string` literal node (quotes stripped, escapes
/// resolved).
pub fn string_value(source: &str, node: Node<'_>) -> String {
    let raw = &source[node.byte_range()];
    let inner = if raw.len() >= 2 { &raw[1..raw.len() - 1] } else { "" };
    unescape(inner)
}

pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('\n') => {}
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex);
            }
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|c| *c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                push_code_point(&mut out, &hex);
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn push_code_point(out: &mut String, hex: &str) {
    if let Some(ch) = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        out.push(ch);
    }
}

/// Leading whitespace of the line containing byte `offset`.
pub fn line_indent(text: &str, offset: usize) -> &str {
    let start = line_start(text, offset);
    let line = &text[start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Grow `range` to cover whole lines when it is alone on them, so removing it
/// leaves no blank residue. A blank line separating the removed statement
/// from its predecessor is folded away as well.
pub fn statement_extent(text: &str, range: Range<usize>) -> Range<usize> {
    let mut start = range.start;
    let mut end = range.end;

    let first_line = line_start(text, start);
    if !text[first_line..start].trim().is_empty() {
        return range;
    }
    start = first_line;

    let line_end = text[end..].find('\n').map_or(text.len(), |i| end + i + 1);
    if !text[end..line_end].trim().is_empty() {
        return range;
    }
    end = line_end;

    let preceded_by_blank = start == 0 || text[..start].ends_with("\n\n");
    if !preceded_by_blank {
        return start..end;
    }

    if end == text.len() {
        // Removing the last statement: drop the blank lines above it too.
        let kept = text[..start].trim_end().len();
        if kept < start {
            start = text[kept..start].find('\n').map_or(start, |i| kept + i + 1);
        }
    } else if let Some(next) = text[end..].find('\n').map(|i| end + i + 1) {
        if text[end..next].trim().is_empty() {
            end = next;
        }
    }
    start..end
}

/// Byte-range replacements collected against one text.
#[derive(Debug, Default)]
pub struct Edits {
    edits: Vec<(Range<usize>, String)>,
}

impl Edits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        self.edits.push((range, text.into()));
    }

    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.edits.push((at..at, text.into()));
    }

    pub fn delete(&mut self, range: Range<usize>) {
        self.edits.push((range, String::new()));
    }


    /// Apply all edits. Edits must not overlap; insertions at the same offset
    /// keep the order they were added in.
    pub fn apply(mut self, text: &str) -> String {
        self.edits.sort_by_key(|(range, _)| (range.start, range.end));
        let mut out = String::with_capacity(text.len());
        let mut pos = 0;
        for (range, replacement) in self.edits {
            debug_assert!(range.start >= pos, "overlapping edits");
            let start = range.start.max(pos);
            out.push_str(&text[pos..start]);
            out.push_str(&replacement);
            pos = range.end.max(start);
        }
        out.push_str(&text[pos..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_from_extension() {
        assert_eq!(Dialect::from_path(Path::new("a/B.tsx")), Dialect::Tsx);
        assert_eq!(Dialect::from_path(Path::new("b.ts")), Dialect::TypeScript);
        assert_eq!(Dialect::from_path(Path::new("c.jsx")), Dialect::JavaScript);
        assert_eq!(Dialect::from_path(Path::new("context.example.js")), Dialect::JavaScript);
    }

    #[test]
    fn parse_rejects_syntax_errors() {
        let err = Document::parse("const = ;", Dialect::JavaScript).err();
        assert!(matches!(err, Some(MigrateError::Syntax { .. })));
    }

    #[test]
    fn parse_tsx_component() {
        let doc = Document::parse(
            "const A = (p: { x: number }) => <div className={css(s.a)} />;\n",
            Dialect::Tsx,
        )
        .expect("parse tsx");
        assert_eq!(doc.root().kind(), "program");
    }

    #[test]
    fn edits_apply_in_offset_order() {
        let mut edits = Edits::new();
        edits.replace(6..9, "bar");
        edits.insert(0, "// head\n");
        edits.delete(9..10);
        assert_eq!(edits.apply("const foo;"), "// head\nconst bar");
    }

    #[test]
    fn same_offset_insertions_keep_order() {
        let mut edits = Edits::new();
        edits.insert(0, "a");
        edits.insert(0, "b");
        edits.replace(0..1, "Z");
        assert_eq!(edits.apply("xy"), "abZy");
    }

    #[test]
    fn unescape_common_sequences() {
        assert_eq!(unescape(r#"a\"b\nA\x42\u{43}"#), "a\"b\nABC");
    }

    #[test]
    fn statement_extent_takes_whole_lines() {
        let text = "a;\n\nconst b = 1;\n\nc;\n";
        let start = text.find("const").unwrap();
        let end = start + "const b = 1;".len();
        let range = statement_extent(text, start..end);
        let mut edits = Edits::new();
        edits.delete(range);
        assert_eq!(edits.apply(text), "a;\n\nc;\n");
    }

    #[test]
    fn statement_extent_at_end_of_file() {
        let text = "a;\n\nconst b = 1;\n";
        let start = text.find("const").unwrap();
        let range = statement_extent(text, start..text.len() - 1);
        let mut edits = Edits::new();
        edits.delete(range);
        assert_eq!(edits.apply(text), "a;\n");
    }

    #[test]
    fn statement_extent_inline_is_untouched() {
        let text = "a; const b = 1;\n";
        let start = text.find("const").unwrap();
        assert_eq!(statement_extent(text, start..text.len() - 1), start..text.len() - 1);
    }

    #[test]
    fn indent_of_nested_line() {
        let text = "x\n    <div className={css(a, b)} />\n";
        let offset = text.find("css").unwrap();
        assert_eq!(line_indent(text, offset), "    ");
    }
}
