//! camelCase style keys to CSS property names.

/// Hyphenate a camel-cased CSS property name:
///
/// ```text
/// backgroundColor -> background-color
/// MozTransition   -> -moz-transition
/// msTransition    -> -ms-transition
/// ```
///
/// Names without capitals and custom properties (`--x`) are returned as-is.
pub fn hyphenate_style_name(name: &str) -> String {
    if name.starts_with("--") || !name.chars().any(|c| c.is_ascii_uppercase()) {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }

    if let Some(rest) = out.strip_prefix("ms-") {
        return format!("-ms-{rest}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_to_kebab() {
        assert_eq!(hyphenate_style_name("backgroundColor"), "background-color");
        assert_eq!(hyphenate_style_name("outlineOffset"), "outline-offset");
        assert_eq!(hyphenate_style_name("color"), "color");
    }

    #[test]
    fn vendor_prefixes() {
        assert_eq!(hyphenate_style_name("MozTransition"), "-moz-transition");
        assert_eq!(hyphenate_style_name("WebkitBoxShadow"), "-webkit-box-shadow");
        assert_eq!(hyphenate_style_name("msTransition"), "-ms-transition");
    }

    #[test]
    fn custom_properties_untouched() {
        assert_eq!(hyphenate_style_name("--brandColor"), "--brandColor");
        assert_eq!(hyphenate_style_name("msfoo"), "msfoo");
    }
}
