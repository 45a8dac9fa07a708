use crate::comments::Comments;

/// The file's `StyleSheet.create({...})` declaration.
#[derive(Debug)]
pub struct StyleTable {
    pub name: String,
    pub exported: bool,
    pub groups: Vec<StyleGroup>,
    pub comments: Comments,
}

/// One named entry of the table, or a nested `":hover"`-style entry inside a
/// group. For nested groups `name` is the selector suffix.
#[derive(Debug)]
pub struct StyleGroup {
    pub name: String,
    pub members: Vec<Member>,
    pub comments: Comments,
}

impl StyleGroup {
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.members.iter().filter_map(|member| match member {
            Member::Declaration(decl) => Some(decl),
            Member::Nested(_) => None,
        })
    }

    pub fn nested(&self) -> impl Iterator<Item = &StyleGroup> {
        self.members.iter().filter_map(|member| match member {
            Member::Nested(group) => Some(group),
            Member::Declaration(_) => None,
        })
    }
}

#[derive(Debug)]
pub enum Member {
    Declaration(Declaration),
    Nested(StyleGroup),
}

#[derive(Debug, Clone)]
pub struct Declaration {
    /// Property name as written in the table (camel-cased).
    pub property: String,
    pub value: Value,
    pub comments: Comments,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String literal, emitted verbatim.
    Text(String),
    Number(f64),
    /// `-1` / `+1`: the operator and the literal it applies to.
    Signed { operator: char, magnitude: f64 },
    /// A dynamic expression already evaluated against the context scope.
    Resolved(String),
}
