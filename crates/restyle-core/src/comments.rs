//! Comment attachment and CSS rendering.
//!
//! tree-sitter keeps comments as sibling nodes. A comment leads the next
//! element unless it sits on the line where the previous element ended, in
//! which case it trails that element.

use std::ops::Range;

use tree_sitter::Node;

use crate::error::Result;
use crate::source::Document;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    /// Text between the delimiters.
    pub body: String,
    pub range: Range<usize>,
}

impl Comment {
    fn from_node(doc: &Document, node: Node<'_>) -> Result<Self> {
        let text = doc.slice(node);
        let (kind, body) = if let Some(body) = text.strip_prefix("//") {
            (CommentKind::Line, body)
        } else if let Some(body) = text.strip_prefix("/*").and_then(|t| t.strip_suffix("*/")) {
            (CommentKind::Block, body)
        } else {
            return Err(doc.unhandled(format!("comment type of `{text}` not handled"), node));
        };
        Ok(Self {
            kind,
            body: body.to_string(),
            range: node.byte_range(),
        })
    }

    /// CSS only has block comments; line comments are closed on the same line.
    pub fn to_css(&self) -> String {
        match self.kind {
            CommentKind::Block => format!("/*{}*/", self.body),
            CommentKind::Line => format!("/*{} */", self.body),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Comments {
    pub leading: Vec<Comment>,
    pub trailing: Vec<Comment>,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }

    /// Each leading comment on its own line, prefixed with `indent`.
    pub fn leading_lines(&self, indent: &str) -> String {
        self.leading
            .iter()
            .map(|comment| format!("{indent}{}\n", comment.to_css()))
            .collect()
    }

    pub fn trailing_suffix(&self) -> String {
        self.trailing
            .iter()
            .map(|comment| format!(" {}", comment.to_css()))
            .collect()
    }

    /// Byte range covering `node` together with its attached comments.
    pub fn extent(&self, node: Node<'_>) -> Range<usize> {
        let start = self
            .leading
            .first()
            .map_or(node.start_byte(), |c| c.range.start.min(node.start_byte()));
        let end = self
            .trailing
            .last()
            .map_or(node.end_byte(), |c| c.range.end.max(node.end_byte()));
        start..end
    }
}

/// Comments attached to `node` among its siblings.
pub fn attached(doc: &Document, node: Node<'_>) -> Result<Comments> {
    let mut leading = Vec::new();
    let mut previous = node.prev_sibling();
    while let Some(sibling) = previous {
        if sibling.kind() != "comment" || trails_previous_element(sibling) {
            break;
        }
        leading.push(Comment::from_node(doc, sibling)?);
        previous = sibling.prev_sibling();
    }
    leading.reverse();

    let row = node.end_position().row;
    let dangling = is_last_member(node);
    let mut trailing = Vec::new();
    let mut next = node.next_sibling();
    while let Some(sibling) = next {
        match sibling.kind() {
            "comment" if dangling || sibling.start_position().row == row => {
                trailing.push(Comment::from_node(doc, sibling)?);
            }
            "," | ";" => {}
            _ => break,
        }
        next = sibling.next_sibling();
    }

    Ok(Comments { leading, trailing })
}

/// The last member of an object literal owns the comments before its `}`.
fn is_last_member(node: Node<'_>) -> bool {
    if !node.parent().is_some_and(|parent| parent.kind() == "object") {
        return false;
    }
    let mut next = node.next_sibling();
    while let Some(sibling) = next {
        if sibling.is_named() && sibling.kind() != "comment" {
            return false;
        }
        next = sibling.next_sibling();
    }
    true
}

fn trails_previous_element(comment: Node<'_>) -> bool {
    let row = comment.start_position().row;
    let mut previous = comment.prev_sibling();
    while let Some(sibling) = previous {
        match sibling.kind() {
            "comment" | "," | ";" => previous = sibling.prev_sibling(),
            _ => return sibling.is_named() && sibling.end_position().row == row,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{named_children, Dialect};

    fn object_pairs(doc: &Document) -> Vec<Node<'_>> {
        let mut pairs = Vec::new();
        crate::source::walk(doc.root(), &mut |node| {
            if node.kind() == "pair" {
                pairs.push(node);
            }
        });
        pairs
    }

    #[test]
    fn leading_and_trailing_on_a_property() {
        let src = "const x = {\n  a: 1,\n  // one\n  /* two */ b: 2 /* three */, // four\n  c: 3,\n};\n";
        let doc = Document::parse(src, Dialect::JavaScript).unwrap();
        let pairs = object_pairs(&doc);
        let b = attached(&doc, pairs[1]).unwrap();
        assert_eq!(b.leading_lines("  "), "  /* one */\n  /* two */\n");
        assert_eq!(b.trailing_suffix(), " /* three */ /* four */");

        let c = attached(&doc, pairs[2]).unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn statement_comments_include_doc_blocks() {
        let src = "f();\n\n// I\n/**\n * II\n */\nconst s = 1; // III\n";
        let doc = Document::parse(src, Dialect::JavaScript).unwrap();
        let statements = named_children(doc.root());
        let comments = attached(&doc, statements[1]).unwrap();
        assert_eq!(comments.leading_lines(""), "/* I */\n/**\n * II\n */\n");
        assert_eq!(comments.trailing_suffix(), " /* III */");
        let extent = comments.extent(statements[1]);
        assert_eq!(&src[extent], "// I\n/**\n * II\n */\nconst s = 1; // III");
    }
}
