use crate::ast::{Declaration, StyleGroup, StyleTable, Value};
use crate::hyphenate::hyphenate_style_name;
use crate::units::maybe_add_px;

/// Stylesheet text for a whole table: the table's leading comments, every
/// rule set separated by a blank line, then its trailing comments.
pub fn emit_css(table: &StyleTable) -> String {
    let rule_sets: Vec<String> = table
        .groups
        .iter()
        .flat_map(|group| emit_rule_sets(group, None))
        .collect();

    let mut out = table.comments.leading_lines("");
    out.push_str(&rule_sets.join("\n\n"));
    out.push_str(&table.comments.trailing_suffix());
    out
}

/// The group's own rule set followed by one per nested group, depth first.
pub fn emit_rule_sets(group: &StyleGroup, selector: Option<&str>) -> Vec<String> {
    let selector = match selector {
        Some(selector) => selector.to_string(),
        None => format!(".{}", group.name),
    };

    let declarations: Vec<String> = group.declarations().map(emit_declaration).collect();

    let mut rule = group.comments.leading_lines("");
    rule.push_str(&selector);
    rule.push_str(" {\n");
    rule.push_str(&declarations.join("\n"));
    rule.push_str("\n}");
    rule.push_str(&group.comments.trailing_suffix());

    let mut rule_sets = vec![rule];
    for nested in group.nested() {
        let nested_selector = format!("{selector}{}", nested.name);
        rule_sets.extend(emit_rule_sets(nested, Some(&nested_selector)));
    }
    rule_sets
}

fn emit_declaration(decl: &Declaration) -> String {
    let mut out = decl.comments.leading_lines("  ");
    out.push_str("  ");
    out.push_str(&hyphenate_style_name(&decl.property));
    out.push_str(": ");
    out.push_str(&emit_value(&decl.property, &decl.value));
    out.push(';');
    out.push_str(&decl.comments.trailing_suffix());
    out
}

fn emit_value(property: &str, value: &Value) -> String {
    match value {
        Value::Text(text) | Value::Resolved(text) => text.clone(),
        Value::Number(number) => maybe_add_px(property, *number),
        Value::Signed { operator, magnitude } => {
            format!("{operator}{}", maybe_add_px(property, *magnitude))
        }
    }
}
